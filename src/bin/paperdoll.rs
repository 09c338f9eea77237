use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use paperdoll::{CatalogConfig, PaperdollResult, RenderRequest};

#[derive(Parser, Debug)]
#[command(name = "paperdoll", version)]
struct Cli {
    /// Catalog config JSON; defaults (plus environment overrides) apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured assets root directory.
    #[arg(long, global = true)]
    assets_root: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List hosted project IDs.
    Projects,
    /// Print a project's manifest.
    Manifest {
        #[arg(long)]
        project: String,
    },
    /// List a project's bases, or print one base's categories and defaults.
    Bases {
        #[arg(long)]
        project: String,
        #[arg(long)]
        base: Option<String>,
    },
    /// Print every category of a base with its items.
    Tree {
        #[arg(long)]
        project: String,
        #[arg(long)]
        base: String,
    },
    /// Print one category with its items, or a single trait of it.
    Category {
        #[arg(long)]
        project: String,
        #[arg(long)]
        base: String,
        #[arg(long)]
        category: String,
        #[arg(long = "trait-id")]
        trait_id: Option<String>,
    },
    /// List a base's variants, or look a single one up by name.
    Variants {
        #[arg(long)]
        project: String,
        #[arg(long)]
        base: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// List a project's premade avatars.
    Premades {
        #[arg(long)]
        project: String,
    },
    /// Print the category and utility icon URL map.
    Icons,
    /// Composite selected traits into a PNG file.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[arg(long)]
    project: String,

    #[arg(long)]
    base: String,

    /// Regular trait ID (repeatable).
    #[arg(long = "trait")]
    traits: Vec<String>,

    /// Variant name for the variant-trait selection.
    #[arg(long)]
    variant: Option<String>,

    /// Variant sub-trait ID (repeatable).
    #[arg(long = "variant-trait")]
    variant_traits: Vec<String>,

    /// Output width in pixels (default 1600).
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels (default 1600).
    #[arg(long)]
    height: Option<u32>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(if err.is_client_fault() { 2 } else { 1 });
    }
}

fn run(cli: Cli) -> PaperdollResult<()> {
    let mut config = match &cli.config {
        Some(path) => CatalogConfig::load(path)?,
        None => {
            let mut config = CatalogConfig::default();
            config.apply_env();
            config
        }
    };
    if let Some(root) = cli.assets_root {
        config.assets_base_path = root;
    }
    config.validate()?;

    match cli.cmd {
        Command::Projects => print_json(&paperdoll::scan::discover_projects(&config)),
        Command::Manifest { project } => {
            print_json(&paperdoll::items::project_manifest(&config, &project)?)
        }
        Command::Bases { project, base } => match base {
            Some(base) => print_json(&paperdoll::items::base_detail(&config, &project, &base)?),
            None => print_json(&paperdoll::items::list_bases(&config, &project)?),
        },
        Command::Tree { project, base } => {
            print_json(&paperdoll::items::load_trait_tree(&config, &project, &base)?)
        }
        Command::Category {
            project,
            base,
            category,
            trait_id,
        } => match trait_id {
            Some(trait_id) => print_json(&paperdoll::items::load_single_trait(
                &config, &project, &base, &category, &trait_id,
            )?),
            None => print_json(&paperdoll::items::load_category_detail(
                &config, &project, &base, &category,
            )?),
        },
        Command::Variants {
            project,
            base,
            name,
        } => match name {
            Some(name) => print_json(&paperdoll::items::load_single_variant(
                &config, &project, &base, &name,
            )?),
            None => print_json(&paperdoll::items::load_variants(&config, &project, &base)?),
        },
        Command::Premades { project } => {
            print_json(&paperdoll::items::load_premades(&config, &project)?)
        }
        Command::Icons => {
            let categories: BTreeMap<&str, String> = paperdoll::urls::CATEGORY_ICONS
                .iter()
                .map(|name| (*name, paperdoll::urls::category_icon_url(&config, name)))
                .collect();
            let utility: BTreeMap<&str, String> = paperdoll::urls::UTILITY_ICONS
                .iter()
                .map(|name| (*name, paperdoll::urls::utility_icon_url(&config, name)))
                .collect();
            print_json(&serde_json::json!({
                "categories": categories,
                "utility": utility,
            }))
        }
        Command::Render(args) => cmd_render(&config, args),
    }
}

fn cmd_render(config: &CatalogConfig, args: RenderArgs) -> PaperdollResult<()> {
    let request = RenderRequest {
        base: args.base,
        traits: args.traits,
        variant: args.variant,
        variant_traits: args.variant_traits,
        width: args.width.unwrap_or(paperdoll::model::DEFAULT_RENDER_DIMENSION),
        height: args.height.unwrap_or(paperdoll::model::DEFAULT_RENDER_DIMENSION),
    };

    let png = paperdoll::composite_avatar(config, &args.project, &request)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> PaperdollResult<()> {
    let rendered = serde_json::to_string_pretty(value).context("serialize response")?;
    println!("{rendered}");
    Ok(())
}
