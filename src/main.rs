use std::path::PathBuf;
use std::process::ExitCode;

use tessy::batch::read_files;
use tessy::config::{self};
use tessy::{OcrEngineMode, PageSegMode, Settings, Tessy};

const USAGE: &str = "\
Usage: tessy [OPTIONS] <image>...
  Read text from images with the Tesseract-OCR library.

Options:
  -c, --config <file>      settings YAML (default: ./tessy.yaml if present)
  -l, --lang <code>        language code (default: eng)
      --psm <0-13>         page segmentation mode (default: 7)
      --oem <0-3>          OCR engine mode (default: 1)
      --dpi <n>            source resolution in dpi (default: 96)
      --whitelist <chars>  only recognise these characters
  -j, --jobs <n>           worker threads, 0 = automatic (default: 0)
      --json               print one JSON object per image
      --list-langs         print available languages and exit
  -V, --version            print version
  -h, --help               print this help";

/// Options collected from the command line.
#[derive(Debug, Default)]
struct CliArgs {
    config: Option<PathBuf>,
    language: Option<String>,
    psm: Option<PageSegMode>,
    oem: Option<OcrEngineMode>,
    dpi: Option<u32>,
    whitelist: Option<String>,
    jobs: usize,
    json: bool,
    list_langs: bool,
    images: Vec<PathBuf>,
}

impl CliArgs {
    /// Command-line values take precedence over the settings file.
    fn apply(&self, settings: &mut Settings) {
        if let Some(language) = &self.language {
            settings.language = language.clone();
        }
        if let Some(psm) = self.psm {
            settings.psm = psm;
        }
        if let Some(oem) = self.oem {
            settings.oem = oem;
        }
        if let Some(dpi) = self.dpi {
            settings.resolution = dpi;
        }
        if let Some(whitelist) = &self.whitelist {
            settings.char_whitelist = Some(whitelist.clone());
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("{USAGE}");
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("tessy {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    init_logging();

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("ERROR: {e}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let mut settings = match config::load_settings(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("ERROR: Failed to load settings: {e}");
            return ExitCode::FAILURE;
        }
    };
    cli.apply(&mut settings);
    if let Err(e) = settings.validate() {
        eprintln!("ERROR: {e}");
        return ExitCode::FAILURE;
    }

    if cli.list_langs {
        return list_languages(&settings);
    }

    if cli.images.is_empty() {
        eprintln!("ERROR: no images given");
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    }

    let results = read_files(&cli.images, &settings, cli.jobs);

    let mut has_error = false;
    for (i, result) in results.iter().enumerate() {
        match result {
            Ok(page) if cli.json => match serde_json::to_string(page) {
                Ok(line) => println!("{line}"),
                Err(e) => {
                    eprintln!("ERROR: {}: {e}", page.path.display());
                    has_error = true;
                }
            },
            Ok(page) => {
                if cli.images.len() > 1 {
                    println!("==> {} <==", page.path.display());
                }
                print!("{}", page.text);
            }
            Err(e) => {
                eprintln!("ERROR: {}: {e}", cli.images[i].display());
                has_error = true;
            }
        }
    }

    if has_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{name} requires a value"))
        };
        let flag = arg.as_str();
        match flag {
            "-c" | "--config" => cli.config = Some(PathBuf::from(value(flag)?)),
            "-l" | "--lang" => cli.language = Some(value(flag)?),
            "--psm" => {
                let raw = parse_number::<i32>(flag, &value(flag)?)?;
                cli.psm = Some(PageSegMode::try_from(raw).map_err(|e| e.to_string())?);
            }
            "--oem" => {
                let raw = parse_number::<i32>(flag, &value(flag)?)?;
                cli.oem = Some(OcrEngineMode::try_from(raw).map_err(|e| e.to_string())?);
            }
            "--dpi" => cli.dpi = Some(parse_number(flag, &value(flag)?)?),
            "--whitelist" => cli.whitelist = Some(value(flag)?),
            "-j" | "--jobs" => cli.jobs = parse_number(flag, &value(flag)?)?,
            "--json" => cli.json = true,
            "--list-langs" => cli.list_langs = true,
            other if other.starts_with('-') && other != "-" => {
                return Err(format!("unknown option '{other}'"));
            }
            image => cli.images.push(PathBuf::from(image)),
        }
    }

    Ok(cli)
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("{name} expects a number, got '{value}'"))
}

fn list_languages(settings: &Settings) -> ExitCode {
    let mut engine = match Tessy::new(settings) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };
    match engine.available_languages() {
        Ok(languages) => {
            for language in languages {
                println!("{language}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
