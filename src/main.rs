use clap::{Parser, Subcommand};
use microsite_gen::app::Microsites;
use microsite_gen::submission::SubmissionFile;
use microsite_gen::{config, output, web};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "microsite-gen")]
#[command(about = "Themed static microsites for small businesses")]
#[command(long_about = "\
Themed static microsites for small businesses

A business submits its details and products through the web form (or a
submission file on the command line). Each submission is saved, its images
are resized, and a static site is generated from the chosen theme:

  sites/
  └── joe_s_caf__/                 # slug of \"Joe's Café!\"
      ├── index.html
      ├── products.html
      ├── about.html
      ├── assets/style.css
      └── images/
          ├── logo.png
          └── product_0.jpg

Built-in themes: minimal, modern, fancy.

Run 'microsite-gen gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Application root holding config.toml; relative paths resolve against it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web form, preview and download server
    Serve {
        /// Override server.host
        #[arg(long)]
        host: Option<String>,
        /// Override server.port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Create a microsite from a TOML submission file
    Create {
        /// Submission file; image paths resolve against its directory
        submission: PathBuf,
    },
    /// Regenerate the site for a stored business id
    Generate { id: u64 },
    /// Regenerate every site from its newest record
    Rebuild,
    /// Write a site's ZIP archive
    Package {
        slug: String,
        /// Directory to write <slug>_microsite.zip into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// List stored businesses
    List,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let default_level = match cli.command {
        Command::Serve { .. } => "info",
        _ => "warn",
    };
    init_logging(default_level);

    let mut app_config = config::load_config(&cli.root)?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                app_config.server.host = host;
            }
            if let Some(port) = port {
                app_config.server.port = port;
            }
            let app = Arc::new(Microsites::open(&cli.root, app_config));
            println!("==> Serving on http://{}", app.config().server.address());
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(web::serve(app))?;
        }
        Command::Create { submission } => {
            let form = SubmissionFile::load(&submission)?;
            let app = Microsites::open(&cli.root, app_config);
            let submitted = app.submit(form)?;
            output::print_submit_output(&submitted);
        }
        Command::Generate { id } => {
            let app = Microsites::open(&cli.root, app_config);
            let report = app.regenerate(id)?;
            println!("==> {}/ ({})", report.slug, report.theme);
            output::print_generate_report(&report);
        }
        Command::Rebuild => {
            let app = Microsites::open(&cli.root, app_config);
            let rebuilt = app.rebuild_all()?;
            output::print_rebuild_output(&rebuilt);
            if rebuilt.iter().any(|r| r.result.is_err()) {
                return Err("some sites failed to rebuild".into());
            }
        }
        Command::Package { slug, out } => {
            let app = Microsites::open(&cli.root, app_config);
            let archive = app.package(&slug)?;
            std::fs::create_dir_all(&out)?;
            let path = out.join(&archive.filename);
            std::fs::write(&path, &archive.bytes)?;
            output::print_package_output(&archive, &path);
        }
        Command::List => {
            let app = Microsites::open(&cli.root, app_config);
            output::print_record_list(&app.records()?);
        }
        Command::GenConfig => {}
    }

    Ok(())
}
