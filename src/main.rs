use anyhow::{bail, Context};
use log::LevelFilter;
use pasteup::logging::{self, StderrLogger};
use pasteup::{HttpTransport, PendingFile, TextArea, TextSurface, UploadOutcome, UploadSession, UploaderConfig};
use std::cell::RefCell;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::rc::Rc;

const USAGE: &str = "usage: pasteup [--config PATH] [--verbose] <markdown-file> <file>...";

#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    verbose: bool,
    document: PathBuf,
    files: Vec<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(options) = parse_args(&args)? else {
        println!("{USAGE}");
        return Ok(());
    };

    let level = if options.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::init(StderrLogger::new(level));

    let config = UploaderConfig::load_or_default(options.config.as_deref())
        .context("failed to load configuration")?;

    let text = match std::fs::read_to_string(&options.document) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", options.document.display()))
        }
    };

    let mut area = TextArea::from_str(&text);
    area.move_cursor_to(area.len_chars());
    let surface = Rc::new(RefCell::new(area));

    let mut files = Vec::with_capacity(options.files.len());
    for path in &options.files {
        files.push(PendingFile::from_path(path).await?);
    }

    let transport = HttpTransport::new(config.clone());
    let session = UploadSession::new(Rc::clone(&surface), transport, config);
    let outcomes = session.upload_all(files).await;

    let area = surface.borrow();
    std::fs::write(&options.document, area.value())
        .with_context(|| format!("failed to write {}", options.document.display()))?;

    for notice in area.notices() {
        eprintln!("{notice}");
    }
    print_summary(&outcomes);
    Ok(())
}

fn parse_args(args: &[String]) -> anyhow::Result<Option<Options>> {
    let mut options = Options::default();
    let mut positional = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "-v" | "--verbose" => options.verbose = true,
            "--config" => match iter.next() {
                Some(path) => options.config = Some(PathBuf::from(path)),
                None => bail!("--config requires a path\n{USAGE}"),
            },
            other if other.starts_with('-') => bail!("unknown option: {other}\n{USAGE}"),
            other => positional.push(PathBuf::from(other)),
        }
    }

    if positional.len() < 2 {
        bail!("{USAGE}");
    }
    options.document = positional.remove(0);
    options.files = positional;
    Ok(Some(options))
}

fn print_summary(outcomes: &[UploadOutcome]) {
    for outcome in outcomes {
        match outcome {
            UploadOutcome::Succeeded { link, fallback, .. } => {
                let note = if *fallback { " (appended)" } else { "" };
                println!("ok      {link}{note}");
            }
            UploadOutcome::Failed { marker, kind, .. } => println!("failed  {marker} [{kind}]"),
            UploadOutcome::Rejected { file, kind } => println!("skipped {file} [{kind}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let options = parse_args(&args(&["--config", "c.json", "-v", "post.md", "a.png", "b.pdf"]))
            .unwrap()
            .unwrap();
        assert_eq!(options.config, Some(PathBuf::from("c.json")));
        assert!(options.verbose);
        assert_eq!(options.document, PathBuf::from("post.md"));
        assert_eq!(options.files.len(), 2);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&["post.md"])).is_err());
        assert!(parse_args(&args(&["--bogus", "a", "b"])).is_err());
        assert!(parse_args(&args(&["--help"])).unwrap().is_none());
    }
}
