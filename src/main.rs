use clap::{Parser, Subcommand, ValueEnum};
use rolo::{AppError, DoctorOptions};

#[derive(Parser)]
#[command(name = "rolo")]
#[command(version)]
#[command(
    about = "Load role definitions and assemble automaton delegation prompts",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a rolo workspace with a demo automaton set
    #[clap(visible_alias = "i")]
    Init,
    /// Scaffold a role or automaton definition from the starter template
    #[clap(visible_alias = "n")]
    New {
        /// What to create: role or automaton
        kind: Option<String>,
        /// Id for the new definition
        name: Option<String>,
    },
    /// List every definition in the workspace
    #[clap(visible_alias = "ls")]
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t = ListFormat::Text)]
        format: ListFormat,
    },
    /// Print the parsed fields of a single definition
    Show {
        /// Role or automaton id
        id: String,
        /// Output format
        #[arg(long, value_enum, default_value_t = ShowFormat::Yaml)]
        format: ShowFormat,
    },
    /// Render a role's output format template with placeholder values
    Render {
        /// Role id
        role: String,
        /// Comma-separated value for the {tool_names} placeholder
        #[arg(long)]
        tools: Option<String>,
        /// Extra placeholder values as key=value pairs
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,
    },
    /// Assemble the full delegation prompt for an automaton
    #[clap(visible_alias = "p")]
    Preview {
        /// Automaton id
        automaton: String,
    },
    /// Validate every definition in the workspace
    Doctor {
        /// Exit non-zero on warnings as well as errors
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ListFormat {
    /// Human-readable listing
    Text,
    /// Machine-readable JSON
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ShowFormat {
    /// YAML document
    Yaml,
    /// Machine-readable JSON
    Json,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<i32, AppError> = match cli.command {
        Commands::Init => rolo::init().map(|_| 0),
        Commands::New { kind, name } => rolo::new(kind.as_deref(), name.as_deref()).map(|_| 0),
        Commands::List { format } => run_list(format),
        Commands::Show { id, format } => run_show(&id, format),
        Commands::Render { role, tools, vars } => run_render(&role, tools.as_deref(), &vars),
        Commands::Preview { automaton } => run_preview(&automaton),
        Commands::Doctor { strict } => {
            rolo::doctor(DoctorOptions { strict }).map(|outcome| outcome.exit_code)
        }
    };

    match result {
        Ok(exit_code) => {
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_list(format: ListFormat) -> Result<i32, AppError> {
    let output = rolo::list()?;
    match format {
        ListFormat::Text => print!("{}", output.render_text()),
        ListFormat::Json => println!("{}", output.to_json()?),
    }
    Ok(0)
}

fn run_show(id: &str, format: ShowFormat) -> Result<i32, AppError> {
    let output = rolo::show(id)?;
    match format {
        ShowFormat::Yaml => print!("{}", output.to_yaml()?),
        ShowFormat::Json => println!("{}", output.to_json()?),
    }
    Ok(0)
}

fn run_render(role: &str, tools: Option<&str>, vars: &[String]) -> Result<i32, AppError> {
    let rendered = rolo::render_role(role, tools, vars)?;
    println!("{}", rendered);
    Ok(0)
}

fn run_preview(automaton: &str) -> Result<i32, AppError> {
    let prompt = rolo::preview(automaton)?;
    print!("{}", prompt.content);
    Ok(0)
}
