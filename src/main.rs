//! pugify - HTML to Pug template converter

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;

use pugify::util::decode_text;
use pugify::{Options, convert};

#[derive(Parser)]
#[command(name = "pugify")]
#[command(version, about = "Convert HTML documents to Pug templates", long_about = None)]
#[command(after_help = "EXAMPLES:
    pugify page.html page.pug    Convert a file
    pugify page.html             Convert to stdout
    cat page.html | pugify       Convert stdin to stdout")]
struct Cli {
    /// Input HTML file (defaults to stdin, "-" also means stdin)
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Output Pug file (defaults to stdout)
    #[arg(value_name = "OUTPUT")]
    output: Option<String>,

    /// Indent with tabs instead of spaces
    #[arg(short, long)]
    tabs: bool,

    /// Number of spaces per indentation level
    #[arg(short = 'n', long, value_name = "N", default_value_t = 2)]
    indent: usize,

    /// Keep <head> and its children
    #[arg(long)]
    keep_head: bool,

    /// Omit the html and body wrapper elements
    #[arg(long)]
    bodyless: bool,

    /// Emit :javascript/:css filter blocks for inline scripts and styles
    #[arg(short, long)]
    scalate: bool,

    /// Maximum line length before text wrapping
    #[arg(short, long, value_name = "LENGTH", default_value_t = 80)]
    wrap: usize,

    /// Prefer double quotes for attribute values
    #[arg(short, long)]
    double: bool,

    /// Separate attributes with spaces instead of commas
    #[arg(long)]
    no_attr_comma: bool,

    /// Drop piped lines that would be empty
    #[arg(long)]
    no_empty_pipe: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> pugify::Result<()> {
    let html = read_input(cli.input.as_deref())?;

    let options = Options {
        use_tabs: cli.tabs,
        indent_spaces: cli.indent,
        keep_head: cli.keep_head,
        bodyless: cli.bodyless,
        scalate: cli.scalate,
        wrap_length: cli.wrap,
        no_attr_comma: cli.no_attr_comma,
        double_quotes: cli.double,
        no_empty_pipe: cli.no_empty_pipe,
    };

    let pug = convert(&html, &options);

    match cli.output.as_deref() {
        Some("-") | None => io::stdout().write_all(pug.as_bytes())?,
        Some(path) => std::fs::write(path, pug)?,
    }
    Ok(())
}

fn read_input(input: Option<&str>) -> pugify::Result<String> {
    let bytes = match input {
        Some("-") | None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
        Some(path) => std::fs::read(path)?,
    };
    Ok(decode_text(&bytes).into_owned())
}
