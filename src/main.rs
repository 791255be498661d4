use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;

use platformed_playground::{
    generate_with, load_document, normalize, write_document, Error, GenerationRequest, Locale,
    PreviewContext, PreviewServer, ProviderConfig, ProviderFactory, ProviderKind, ReferenceImage,
    SandboxPolicy, SharedSurface, Studio,
};

mod console;

use console::Console;

#[derive(Parser)]
#[command(name = "playground", version, about = "Generate HTML5 games with AI and preview them in a sandbox")]
struct Cli {
    /// Provider to use instead of the one inferred from the API key
    #[arg(long, global = true)]
    provider: Option<ProviderKind>,
    /// Model identifier override
    #[arg(long, global = true)]
    model: Option<String>,
    /// Language of notifications: en or pt-BR
    #[arg(long, global = true)]
    locale: Option<Locale>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a game and print it, or write it to a file
    Generate {
        #[arg(short, long)]
        prompt: String,
        /// Reference image sent along with the instruction
        #[arg(long)]
        image: Option<PathBuf>,
        /// Existing document to modify instead of starting over
        #[arg(long)]
        modify: Option<PathBuf>,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Extract the HTML document from a raw model reply (file or stdin)
    Normalize { file: Option<PathBuf> },
    /// Serve the sandboxed preview and read commands from stdin
    Serve {
        #[arg(long, default_value_t = 8787)]
        port: u16,
        /// Document to start with
        #[arg(long)]
        load: Option<PathBuf>,
    },
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}

fn resolve_locale(cli: &Cli) -> Locale {
    if let Some(locale) = cli.locale {
        return locale;
    }
    match std::env::var("PLAYGROUND_LOCALE") {
        Ok(value) if !value.trim().is_empty() => value.parse().unwrap_or_else(|e| {
            log::warn!("{e}");
            Locale::default()
        }),
        _ => Locale::default(),
    }
}

fn provider_config(cli: &Cli) -> Result<ProviderConfig, Error> {
    let mut config = ProviderConfig::from_env_with_kind(cli.provider)?;
    if let Some(model) = &cli.model {
        config = config.with_model(model.clone());
    }
    Ok(config)
}

async fn run(cli: Cli, locale: Locale) -> Result<(), Error> {
    match &cli.command {
        Command::Generate {
            prompt,
            image,
            modify,
            out,
        } => {
            let mut request = GenerationRequest::new(prompt.clone());
            if let Some(path) = image {
                request = request.with_image(ReferenceImage::from_path(path)?);
            }
            if let Some(path) = modify {
                request = request.with_existing(load_document(path)?);
            }
            request.validate()?;

            let provider = ProviderFactory::create(&provider_config(&cli)?)?;
            let document = generate_with(provider.as_ref(), &request).await?;
            if document.is_blank() {
                eprintln!("{}", locale.empty_generation());
                return Ok(());
            }

            match out {
                Some(path) => write_document(&document, path)?,
                None => println!("{document}"),
            }
        }
        Command::Normalize { file } => {
            let raw = match file {
                Some(path) => tokio::fs::read_to_string(path).await?,
                None => {
                    let mut raw = String::new();
                    tokio::io::stdin().read_to_string(&mut raw).await?;
                    raw
                }
            };
            println!("{}", normalize(&raw));
        }
        Command::Serve { port, load } => {
            let provider = ProviderFactory::create(&provider_config(&cli)?)?;

            let surface = SharedSurface::new();
            let context = PreviewContext {
                surface: surface.clone(),
                policy: SandboxPolicy::preview(),
                locale,
            };
            let server = PreviewServer::bind(("127.0.0.1", *port), context).await?;
            println!("Preview at http://{}/", server.local_addr()?);
            tokio::spawn(async move {
                if let Err(e) = server.run().await {
                    log::error!("Preview server stopped: {e}");
                }
            });

            let mut console = Console::new(Studio::new(provider, surface), locale);
            if let Some(path) = load {
                console.load(path.clone());
            }
            console.run().await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_logger();

    let cli = Cli::parse();
    let locale = resolve_locale(&cli);

    match run(cli, locale).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{e:?}");
            eprintln!("{}", e.user_message(locale));
            ExitCode::FAILURE
        }
    }
}
