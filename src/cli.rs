use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "pomup",
    about = "Maven POM updater - checks declared dependencies against Maven Central and rewrites version numbers",
    version,
    author
)]
pub struct Cli {
    /// Path to the project directory (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub path: String,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `update` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite dependency versions and write updated_pom.xml
    Update {
        /// Filter dependencies by coordinate using glob syntax (e.g. "*okhttp*")
        #[arg(long, value_name = "GLOB")]
        filter: Option<String>,

        /// Maven repository base URL to query instead of Maven Central
        #[arg(long, value_name = "URL")]
        repository: Option<String>,
    },

    /// Check for available dependency updates without writing anything
    Check {
        /// Filter dependencies by coordinate using glob syntax (e.g. "*okhttp*")
        #[arg(long, value_name = "GLOB")]
        filter: Option<String>,

        /// Maven repository base URL to query instead of Maven Central
        #[arg(long, value_name = "URL")]
        repository: Option<String>,
    },

    /// List the dependencies declared in pom.xml
    List,
}
