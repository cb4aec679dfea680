use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tag-counter")]
#[command(
    about = "Count XML elements by local name across a directory tree",
    long_about = None
)]
pub struct Cli {
    /// Directory to search recursively
    #[arg(short, long)]
    pub directory: PathBuf,

    /// Element local name to count (case-sensitive, namespace prefixes ignored)
    #[arg(short, long)]
    pub tag_name: String,

    /// Comma-separated file name patterns [default: *.xml,*.out]
    #[arg(short, long)]
    pub extensions: Option<String>,

    /// Print the root element and a sample of elements from the first parsed file
    #[arg(long)]
    pub show_debug: bool,

    /// Show a progress bar with an ETA while counting
    #[arg(long)]
    pub show_progress: bool,
}
