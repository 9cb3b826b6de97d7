use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use skillax::blogs::{sample_posts, BlogCatalog};
use skillax::config::{config_file_path, ensure_workspace_structure, load_or_default, save};
use skillax::course_catalog::{sample_courses, CourseCatalog};

fn main() -> Result<()> {
    let args = CliArgs::parse()?;
    let config_path = config_file_path()?;
    let mut config = load_or_default()?;
    let mut changed = !config_path.exists();

    changed |= apply_override(&mut config.storage.data_dir, args.data_dir);
    changed |= apply_text_override(&mut config.server.public_base_url, args.public_url);
    changed |= apply_text_override(&mut config.server.bind_addr, args.bind);
    changed |= apply_text_override(&mut config.enrichment.endpoint, args.endpoint);
    changed |= apply_text_override(&mut config.enrichment.model, args.model);
    config
        .server
        .socket_addr()
        .context("Refusing to save an unusable bind address")?;

    if changed {
        save(&config)?;
        println!("Configuration recorded at {}", config_path.display());
    } else {
        println!("Configuration already up to date at {}", config_path.display());
    }

    let paths = ensure_workspace_structure(&config)?;
    let catalog = BlogCatalog::new(paths.blogs_file());
    if args.seed_blogs || !catalog.path().exists() {
        let outcome = catalog
            .replace_all(&sample_posts())
            .context("Failed to seed blog catalog")?;
        println!(
            "Seeded blog catalog at {} (sha256 {})",
            outcome.path.display(),
            outcome.hash
        );
    }
    let courses = CourseCatalog::new(paths.courses_file());
    if args.seed_courses || !courses.path().exists() {
        let outcome = courses
            .replace_all(&sample_courses())
            .context("Failed to seed course catalog")?;
        println!(
            "Seeded course catalog at {} (sha256 {})",
            outcome.path.display(),
            outcome.hash
        );
    }

    if config.enrichment.api_key().is_none() {
        println!(
            "Note: set {} to enable profile enrichment and chat replies.",
            config.enrichment.api_key_env
        );
    }
    if config.admin.token().is_none() {
        println!(
            "Note: set {} to open the admin endpoints.",
            config.admin.token_env
        );
    }

    Ok(())
}

#[derive(Default)]
struct CliArgs {
    data_dir: Option<PathBuf>,
    public_url: Option<String>,
    bind: Option<String>,
    endpoint: Option<String>,
    model: Option<String>,
    seed_blogs: bool,
    seed_courses: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data-dir" => {
                    let value = args.next().context("Expected a path after --data-dir")?;
                    parsed.data_dir = Some(PathBuf::from(value));
                }
                "--public-url" => {
                    let value = args.next().context("Expected a URL after --public-url")?;
                    parsed.public_url = Some(value);
                }
                "--bind" => {
                    let value = args.next().context("Expected host:port after --bind")?;
                    parsed.bind = Some(value);
                }
                "--endpoint" => {
                    let value = args.next().context("Expected a URL after --endpoint")?;
                    parsed.endpoint = Some(value);
                }
                "--model" => {
                    let value = args.next().context("Expected a model name after --model")?;
                    parsed.model = Some(value);
                }
                "--seed-blogs" => parsed.seed_blogs = true,
                "--seed-courses" => parsed.seed_courses = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => {
                    return Err(anyhow!(
                        "Unknown argument '{other}'. Run with --help for usage instructions."
                    ));
                }
            }
        }
        Ok(parsed)
    }
}

fn print_usage() {
    println!("Skillax setup");
    println!("Writes config.toml and prepares the data directory.");
    println!("Usage: cargo run --bin setup -- [options]");
    println!("Options:");
    println!("  --data-dir <path>     Store records under this directory");
    println!("  --public-url <url>    Front-end origin used in share links");
    println!("  --bind <host:port>    Listener address (default: 0.0.0.0:8001)");
    println!("  --endpoint <url>      Chat-completions endpoint for enrichment and chat");
    println!("  --model <name>        Model requested from the endpoint (default: gpt-4o)");
    println!("  --seed-blogs          Overwrite the blog catalog with sample posts");
    println!("  --seed-courses        Overwrite the course catalog with the program pages");
}

fn apply_override<T: PartialEq>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(value) if slot.as_ref() != Some(&value) => {
            *slot = Some(value);
            true
        }
        _ => false,
    }
}

fn apply_text_override(slot: &mut String, value: Option<String>) -> bool {
    match value {
        Some(value) if *slot != value => {
            *slot = value;
            true
        }
        _ => false,
    }
}
