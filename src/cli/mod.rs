use clap::Parser;

/// Action handlers and the options they share.
pub mod handlers;

/// Builds the color-aware help string at runtime.
fn build_help_string() -> &'static str {
    // Replaces semantic tags like `<title>` in the localized template with ANSI styles.
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let template = t!("cli.help.template");

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let hl = if use_colors { "\x1b[1;36m" } else { "" }; // Bold Cyan
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let group = if use_colors { "\x1b[1;32m" } else { "" }; // Bold Green
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let formatted_string = template
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<group>", group)
        .replace("</group>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted_string.into_boxed_str())
}

/// patcompose: compose and validate PAT workloads from a dependency-aware catalog.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// Catalog file to use instead of the configured one.
    #[arg(long, short, value_name = "PATH")]
    pub catalog: Option<String>,

    /// The action followed by its own arguments. Each handler parses the rest.
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// Splits the trailing arguments into the action name and what is passed to its handler.
    pub fn action(&self) -> Option<(&str, Vec<String>)> {
        let (first, rest) = self.args.split_first()?;
        Some((first.as_str(), rest.to_vec()))
    }

    /// The options that apply to every handler.
    pub fn global_options(&self) -> handlers::commons::GlobalOptions {
        handlers::commons::GlobalOptions {
            catalog: self.catalog.clone(),
        }
    }
}
