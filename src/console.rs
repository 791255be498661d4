//! Line-oriented stand-in for the code panel, driving one owned session.

use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;

use platformed_playground::{
    export_document, load_document, write_document, CompletedGeneration, Error, GenerationOutcome,
    Locale, ReferenceImage, SharedSurface, Studio,
};

const HELP: &str = "\
Commands:
  gen <text>      generate a game, or modify the current one
  image <path>    attach a reference image to the next generations
  image           detach the reference image
  load <file>     replace the current code with a file
  show            print the current code
  run             run the current code in the preview
  stop            blank the preview
  clear           discard the current code
  save [path]     export the current code (default ./meu-jogo-bytez.html)
  status          show session state
  help            show this help
  quit            exit";

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Generate(String),
    Image(Option<PathBuf>),
    Load(PathBuf),
    Show,
    Run,
    Stop,
    Clear,
    Save(Option<PathBuf>),
    Status,
    Help,
    Quit,
    Unknown(String),
    Nothing,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        match (word, arg) {
            ("", _) => ConsoleCommand::Nothing,
            ("gen" | "generate", Some(text)) => ConsoleCommand::Generate(text),
            ("gen" | "generate", None) => ConsoleCommand::Generate(String::new()),
            ("image", arg) => ConsoleCommand::Image(arg.map(PathBuf::from)),
            ("load", Some(path)) => ConsoleCommand::Load(PathBuf::from(path)),
            ("show", None) => ConsoleCommand::Show,
            ("run", None) => ConsoleCommand::Run,
            ("stop", None) => ConsoleCommand::Stop,
            ("clear", None) => ConsoleCommand::Clear,
            ("save", arg) => ConsoleCommand::Save(arg.map(PathBuf::from)),
            ("status", None) => ConsoleCommand::Status,
            ("help" | "?", None) => ConsoleCommand::Help,
            ("quit" | "exit", None) => ConsoleCommand::Quit,
            _ => ConsoleCommand::Unknown(line.to_string()),
        }
    }
}

pub struct Console {
    studio: Studio<SharedSurface>,
    locale: Locale,
    image: Option<ReferenceImage>,
    results_tx: mpsc::UnboundedSender<CompletedGeneration>,
    results_rx: mpsc::UnboundedReceiver<CompletedGeneration>,
}

impl Console {
    pub fn new(studio: Studio<SharedSurface>, locale: Locale) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            studio,
            locale,
            image: None,
            results_tx,
            results_rx,
        }
    }

    /// Replace the current code with a file's content.
    pub fn load(&mut self, path: PathBuf) {
        match load_document(&path) {
            Ok(document) => {
                println!("Loaded {} bytes from {}. Type `run` to start it.", document.len(), path.display());
                self.studio.session_mut().set_document(document);
                self.publish();
            }
            Err(e) => self.notify(&e),
        }
    }

    /// Read commands until `quit` or end of input.
    pub async fn run(mut self) -> Result<(), Error> {
        println!("{HELP}");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    let command = ConsoleCommand::parse(&line);
                    if command == ConsoleCommand::Quit {
                        break;
                    }
                    self.handle(command, &mut lines).await?;
                }
                Some(completed) = self.results_rx.recv() => {
                    self.apply(completed);
                }
            }
        }

        if self.studio.session().is_busy() {
            log::info!("Exiting with a generation still in flight");
        }
        Ok(())
    }

    async fn handle(
        &mut self,
        command: ConsoleCommand,
        lines: &mut Lines<BufReader<Stdin>>,
    ) -> Result<(), Error> {
        match command {
            ConsoleCommand::Generate(text) => self.generate(&text),
            ConsoleCommand::Image(Some(path)) => match ReferenceImage::from_path(&path) {
                Ok(image) => {
                    println!("Reference image attached ({}, {} bytes).", image.mime_type, image.data.len());
                    self.image = Some(image);
                }
                Err(e) => self.notify(&e),
            },
            ConsoleCommand::Image(None) => {
                self.image = None;
                println!("Reference image removed.");
            }
            ConsoleCommand::Load(path) => self.load(path),
            ConsoleCommand::Show => println!("{}", self.studio.session().document()),
            ConsoleCommand::Run => match self.studio.session_mut().run() {
                Ok(()) => println!("Running."),
                Err(e) => self.notify(&e),
            },
            ConsoleCommand::Stop => {
                self.studio.session_mut().stop();
                println!("Preview: {:?}.", self.studio.session().state());
            }
            ConsoleCommand::Clear => {
                println!("{} [y/N]", self.locale.confirm_clear());
                let answer = lines.next_line().await?.unwrap_or_default();
                let locale = self.locale;
                if self.studio.session_mut().clear(|| locale.is_affirmative(&answer)) {
                    println!("Cleared.");
                }
            }
            ConsoleCommand::Save(path) => {
                let document = self.studio.session().document();
                let result = match path {
                    Some(path) => write_document(document, &path).map(|()| path),
                    None => export_document(document, "."),
                };
                match result {
                    Ok(path) => println!("Saved to {}.", path.display()),
                    Err(e) => self.notify(&e),
                }
            }
            ConsoleCommand::Status => self.status(),
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Unknown(line) => println!("Unknown command: {line}. Type `help`."),
            ConsoleCommand::Quit | ConsoleCommand::Nothing => {}
        }

        self.publish();
        Ok(())
    }

    fn generate(&mut self, instruction: &str) {
        let pending = match self.studio.start_generation(instruction, self.image.clone()) {
            Ok(pending) => pending,
            Err(e) => return self.notify(&e),
        };

        let mode = if pending.request().existing().is_some() {
            "Modifying the current game"
        } else {
            "Generating a new game"
        };
        println!("{mode} with {}...", self.studio.provider().name());

        let results = self.results_tx.clone();
        tokio::spawn(async move {
            let completed = pending.execute().await;
            if results.send(completed).is_err() {
                log::debug!("Console closed before the generation finished");
            }
        });
    }

    fn apply(&mut self, completed: CompletedGeneration) {
        match self.studio.complete_generation(completed) {
            Ok(GenerationOutcome::Applied) => {
                println!(
                    "Game ready ({} bytes), running in the preview.",
                    self.studio.session().document().len()
                );
            }
            Ok(GenerationOutcome::Empty) => println!("{}", self.locale.empty_generation()),
            Ok(GenerationOutcome::Discarded) => {}
            Err(e) => self.notify(&e),
        }
        self.publish();
    }

    fn status(&self) {
        let session = self.studio.session();
        println!("Provider: {} ({})", self.studio.provider().name(), self.studio.provider().model());
        println!("Preview:  {:?}", session.state());
        println!("Code:     {} bytes", session.document().len());
        println!("Busy:     {}", session.is_busy());
        match &self.image {
            Some(image) => println!("Image:    {} ({} bytes)", image.mime_type, image.data.len()),
            None => println!("Image:    none"),
        }
    }

    fn publish(&self) {
        let session = self.studio.session();
        session.surface().set_source(session.document());
    }

    fn notify(&self, error: &Error) {
        log::warn!("{error}");
        eprintln!("{}", error.user_message(self.locale));
    }
}
