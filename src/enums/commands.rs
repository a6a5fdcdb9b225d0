use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the scan API server
    Serve {
        #[clap(long)]
        host: Option<String>,
        #[clap(short, long)]
        port: Option<u16>,
    },
    /// Analyze a single issue description and print the result
    Analyze {
        issue: String,
        /// Print the result as JSON instead of text
        #[clap(long)]
        json: bool,
    },
    /// Write a sample configuration file
    Init,
    /// Check the configuration and API key
    Validate,
}
