use super::image::ReferenceImage;
use super::request::GenerationRequest;

/// The provider-independent prompt: one user turn made of text and an
/// optional reference image.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    text: String,
    image: Option<ReferenceImage>,
}

impl Prompt {
    /// Create a text-only prompt.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }

    /// Attach a reference image.
    pub fn with_image(mut self, image: ReferenceImage) -> Self {
        self.image = Some(image);
        self
    }

    /// Build the prompt for a generation request.
    ///
    /// A non-blank existing document selects the modify template, otherwise
    /// the create template is used.
    pub fn for_request(request: &GenerationRequest) -> Self {
        let has_image = request.reference_image.is_some();
        let text = match request.existing() {
            Some(existing) => modify_template(existing.as_str(), &request.instruction, has_image),
            None => create_template(&request.instruction, has_image),
        };

        Self {
            text,
            image: request.reference_image.clone(),
        }
    }

    pub fn text_content(&self) -> &str {
        &self.text
    }

    pub fn image(&self) -> Option<&ReferenceImage> {
        self.image.as_ref()
    }
}

impl From<&str> for Prompt {
    fn from(s: &str) -> Self {
        Prompt::text(s)
    }
}

impl From<String> for Prompt {
    fn from(s: String) -> Self {
        Prompt::text(s)
    }
}

fn modify_template(current_code: &str, instruction: &str, has_image: bool) -> String {
    let image_note = if has_image {
        "(The user attached a reference image. Use it to guide style, colors or layout, \
but do not link it directly; recreate the effect with CSS/Canvas.)"
    } else {
        ""
    };

    format!(
        r#"You are a senior web game developer (HTML5/Canvas/CSS).

Below is the CURRENT SOURCE CODE:
---
{current_code}
---

MODIFICATION REQUEST: "{instruction}"
{image_note}

CRITICAL RULES FOR MODIFICATION:
1. Keep VISUAL INTEGRITY: no overlapping text or misaligned elements.
2. For Canvas: call 'ctx.clearRect' before drawing each animation frame.
3. For HTML/CSS: be careful with 'position: absolute'; make sure containers have defined sizes.
4. IMAGES: if the user asks for images, use:
   - For photos/backgrounds: 'https://placehold.co/600x400/png' (adjust the size as needed).
   - For game sprites: inline SVGs (data:image/svg+xml...) or draw directly on the Canvas.
   - NEVER use local paths (e.g. 'img/photo.png'), they will break.
5. Do not break the existing logic.
6. Return the COMPLETE HTML CODE (single-file).
7. Do NOT use markdown. Return ONLY the raw code starting with <!DOCTYPE html>."#
    )
}

fn create_template(instruction: &str, has_image: bool) -> String {
    let image_note = if has_image {
        "The user attached an image. Use it as the main visual inspiration (colors, layout, style) for the game."
    } else {
        ""
    };

    format!(
        r#"You are an expert in web development and simple HTML5 game creation.

TASK: Write complete code in a single HTML file (with embedded CSS and JS) for: "{instruction}".
{image_note}

RULES:
1. The code must be self-contained (single-file).
2. Use modern, good-looking CSS. Avoid visual bugs.
3. If it is a game, make sure the controls work.
4. IMAGES: if needed, use reliable external URLs (e.g. https://placehold.co/600x400) or SVG data URIs for sprites. Do NOT use local files.
5. Do NOT use markdown (no ```html). Return ONLY the raw code.
6. Start the answer strictly with <!DOCTYPE html>."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GeneratedDocument;

    #[test]
    fn test_create_template_selected_without_existing_code() {
        let prompt = Prompt::for_request(&GenerationRequest::new("a pong clone"));
        let text = prompt.text_content();

        assert!(text.contains(r#"for: "a pong clone""#));
        assert!(text.contains("Start the answer strictly with <!DOCTYPE html>"));
        assert!(text.contains("placehold.co"));
        assert!(!text.contains("CURRENT SOURCE CODE"));
        assert!(prompt.image().is_none());
    }

    #[test]
    fn test_modify_template_embeds_current_code() {
        let current = "<!DOCTYPE html><html><body><canvas></canvas></body></html>";
        let request = GenerationRequest::new("make the ball red")
            .with_existing(GeneratedDocument::new(current));
        let text = Prompt::for_request(&request).text_content().to_string();

        assert!(text.contains(&format!("---\n{current}\n---")));
        assert!(text.contains(r#"MODIFICATION REQUEST: "make the ball red""#));
        assert!(text.contains("ctx.clearRect"));
        assert!(text.contains("Do NOT use markdown"));
        assert!(!text.contains("reference image"));
    }

    #[test]
    fn test_image_note_and_attachment() {
        let image = ReferenceImage::new("image/png", vec![0x89, 0x50]);
        let request = GenerationRequest::new("").with_image(image.clone());
        let prompt = Prompt::for_request(&request);

        assert!(prompt.text_content().contains("main visual inspiration"));
        assert_eq!(prompt.image(), Some(&image));

        let request = request.with_existing(GeneratedDocument::new("<html></html>"));
        let prompt = Prompt::for_request(&request);
        assert!(prompt.text_content().contains("reference image"));
    }
}
