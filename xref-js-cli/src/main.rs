use clap::Parser;
use serde::Deserialize;
use serde::Serialize;
use std::fs::File;
use std::io::stdin;
use std::io::stdout;
use std::io::Read;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use xref_js::diagnostic::Diagnostic;
use xref_js::oracle::ResolutionTable;
use xref_js::syntax::NodeRecord;
use xref_js::syntax::SyntaxTree;
use xref_js::AnnotateOptions;
use xref_js::Annotator;
use xref_js::DEFAULT_SPECIFIER_CLASS;

#[derive(Parser)]
#[command(
  name = "xref-js",
  version,
  about = "Render a resolved JS/TS file as cross-referenced HTML"
)]
struct Cli {
  /// Annotation input (JSON with `source`, `nodes` and `resolution`); omit for stdin.
  #[arg(short, long)]
  input: Option<PathBuf>,

  /// Output destination; omit for stdout.
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Emit `{ schema_version, html, diagnostics }` instead of bare HTML.
  #[arg(long)]
  json: bool,

  /// Leave URLs in comments and strings as plain text.
  #[arg(long)]
  no_linkify: bool,

  /// Class of the span wrapping module specifier literals.
  #[arg(long, default_value = DEFAULT_SPECIFIER_CLASS)]
  specifier_class: String,

  /// Emit JSON tracing events for each pass to stderr.
  #[arg(long)]
  trace: bool,
}

#[derive(Deserialize)]
struct Input {
  source: String,
  nodes: Vec<NodeRecord>,
  #[serde(default)]
  resolution: ResolutionTable,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
  schema_version: u32,
  html: &'a str,
  diagnostics: &'a [Diagnostic],
}

fn init_tracing(enabled: bool) {
  if !enabled {
    return;
  }
  let _ = tracing_subscriber::fmt()
    .with_span_events(FmtSpan::CLOSE)
    .with_max_level(Level::TRACE)
    .json()
    .with_ansi(false)
    .with_writer(std::io::stderr)
    .try_init();
}

fn read_input(path: Option<&PathBuf>) -> Result<Input, String> {
  let mut raw = Vec::new();
  let mut reader: Box<dyn Read> = match path {
    Some(p) => Box::new(
      File::open(p).map_err(|err| format!("failed to open {}: {err}", p.display()))?,
    ),
    None => Box::new(stdin()),
  };
  reader
    .read_to_end(&mut raw)
    .map_err(|err| format!("failed to read input: {err}"))?;
  serde_json::from_slice(&raw).map_err(|err| format!("invalid annotation input: {err}"))
}

fn write_output(path: Option<&PathBuf>, bytes: &[u8]) -> Result<(), String> {
  match path {
    Some(p) => File::create(p)
      .and_then(|mut file| file.write_all(bytes))
      .map_err(|err| format!("failed to write {}: {err}", p.display())),
    None => stdout()
      .write_all(bytes)
      .map_err(|err| format!("failed to write <stdout>: {err}")),
  }
}

fn run(args: &Cli) -> Result<(), String> {
  let input_name = args
    .input
    .as_ref()
    .map(|p| p.to_string_lossy().into_owned())
    .unwrap_or_else(|| "<stdin>".to_string());
  let input = read_input(args.input.as_ref())?;
  let tree = SyntaxTree::from_records(input.nodes).map_err(|err| format!("{input_name}: {err}"))?;

  let options = AnnotateOptions::new()
    .with_linkify(!args.no_linkify)
    .with_specifier_class(args.specifier_class.as_str());
  let mut annotator = Annotator::new(options);
  let annotated = annotator
    .annotate(&input.source, &tree, &input.resolution)
    .map_err(|err| format!("{input_name}: {err}"))?;

  let output = if args.json {
    let json = JsonOutput {
      schema_version: 1,
      html: &annotated.html,
      diagnostics: &annotated.diagnostics,
    };
    serde_json::to_vec(&json).map_err(|err| format!("failed to serialize output: {err}"))?
  } else {
    for diagnostic in &annotated.diagnostics {
      eprintln!("{}", diagnostic.render(&input_name, &input.source));
    }
    annotated.html.into_bytes()
  };
  write_output(args.output.as_ref(), &output)
}

fn main() -> ExitCode {
  let args = Cli::parse();
  init_tracing(args.trace);
  match run(&args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(message) => {
      eprintln!("error: {message}");
      ExitCode::from(1)
    }
  }
}
