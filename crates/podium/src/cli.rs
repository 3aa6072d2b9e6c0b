use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "podium")]
#[command(author, version, about)]
#[command(long_about = "A dual-window PDF presenter.\n\n\
    The audience window shows the slide, a web page or a video; the speaker \
    console shows the current and next slide, a timer and the notes.\n\n\
    Examples:\n  \
    podium talk.pdf               Present talk.pdf\n  \
    podium talk.pdf -d 30         Count down from 30 minutes\n  \
    tail -f chat | podium -f x.pdf  Scroll stdin lines over the slides\n  \
    podium config show            Print the current configuration")]
#[command(disable_version_flag = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// PDF file to present
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Planned duration of the talk in minutes
    #[arg(short, long, value_name = "MINUTES")]
    pub duration: Option<u64>,

    /// Scroll lines read from stdin across the audience window
    #[arg(short, long)]
    pub feed: bool,

    /// Start both windows fullscreen
    #[arg(long)]
    pub fullscreen: bool,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,

    /// Increase log verbosity (repeat for more)
    #[arg(long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.duration, defaults.theme, defaults.feed)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            None => {
                let file = match self.file {
                    Some(file) => file,
                    None => prompt_for_file()?,
                };
                if !file.is_file() {
                    anyhow::bail!("File not found: {}", file.display());
                }
                crate::app::run(crate::app::Options {
                    file,
                    duration: self.duration,
                    feed: self.feed,
                    fullscreen: self.fullscreen,
                })
            }
        }
    }
}

fn prompt_for_file() -> anyhow::Result<PathBuf> {
    let answer = inquire::Text::new("PDF to present:")
        .with_help_message("Path to a PDF file")
        .with_validator(|input: &str| {
            let path = std::path::Path::new(input.trim());
            if path.is_file() {
                Ok(inquire::validator::Validation::Valid)
            } else {
                Ok(inquire::validator::Validation::Invalid(
                    "No such file".into(),
                ))
            }
        })
        .prompt()
        .map_err(|e| anyhow::anyhow!("No file selected: {e}"))?;
    Ok(PathBuf::from(answer.trim()))
}
