use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::info;
use uuid::Uuid;

use tsb::record::{Library, SummaryRecord, SummaryStats, appended_file_name};
use tsb::service::{SummarizeResponse, SummarizerClient};
use tsb::{Config, Error, Result};

#[derive(Parser)]
#[command(name = "tsb")]
#[command(about = "Format, render and browse transcript summaries")]
struct Cli {
    /// Config file (defaults are used for anything it leaves out)
    #[arg(short, long, global = true, default_value = "tsb.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a summary text file, or the summary in a saved service response
    Render {
        /// Summary text, or a `.json` response from the summarization service
        input: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Output file (PDF defaults to `<input stem>.summary.pdf`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Send a PDF or TXT transcript to the summarization service
    Summarize {
        /// Transcript to upload
        file: PathBuf,

        /// Service base URL, overriding config and TSB_BACKEND_URL
        #[arg(long)]
        backend: Option<String>,

        /// Save the raw service response as JSON
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Add the new summary to this library export (created if missing)
        #[arg(long)]
        library: Option<PathBuf>,

        /// Owner recorded on the new summary
        #[arg(long, default_value_t = Uuid::nil())]
        user: Uuid,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List an exported summary library, or show one summary from it
    Library {
        /// JSON export of summary records
        export: PathBuf,

        /// Summary id to show
        #[arg(long)]
        show: Option<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Output file for the shown summary
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Html,
    Typst,
    Json,
    Pdf,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)?.with_env();

    match cli.command {
        Command::Render {
            input,
            format,
            output,
        } => {
            let summary = read_summary(&input)?;
            let output = output.or_else(|| default_pdf_path(format, &input));
            emit(&summary, format, &config, output.as_deref())
        }
        Command::Summarize {
            file,
            backend,
            save,
            library,
            user,
            format,
        } => {
            let config = config.with_backend_override(backend);
            let client = SummarizerClient::new(&config.service)?;
            let response = client.summarize(&file)?;

            if let Some(path) = save {
                let json = serde_json::to_string_pretty(&response)?;
                write_file(&path, json.as_bytes())?;
                println!("Saved response to {}", path.display());
            }

            let uploaded_at = Utc::now();
            let record = SummaryRecord::from_response(
                &response,
                user,
                appended_file_name(&response.file_name, uploaded_at.timestamp_millis()),
                uploaded_at,
            );
            if let Some(path) = library {
                let mut exported = Library::load_or_empty(&path)?;
                exported.insert(record.clone());
                exported.save(&path)?;
                println!("Added {} to {}", record.summary_id, path.display());
            }

            print_stats(&record.stats());
            let output = default_pdf_path(format, &file);
            emit(response.summary.trim(), format, &config, output.as_deref())
        }
        Command::Library {
            export,
            show,
            format,
            output,
        } => {
            let library = Library::load(&export)?;
            match show {
                Some(id) => {
                    let record = library.find(&id)?;
                    if output.is_none() {
                        print_stats(&record.stats());
                    }
                    let output = output.or_else(|| {
                        default_pdf_path(format, Path::new(&record.original_file_name()))
                    });
                    emit(record.summary_text(), format, &config, output.as_deref())
                }
                None => {
                    print_library(&library.recent_first());
                    Ok(())
                }
            }
        }
    }
}

/// Read summary text from a plain file or from a saved service response.
fn read_summary(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let response: SummarizeResponse = serde_json::from_str(&content)?;
        info!("rendering summary of {}", response.file_name);
        return Ok(response.summary.trim().to_string());
    }

    Ok(content.trim().to_string())
}

fn default_pdf_path(format: OutputFormat, input: &Path) -> Option<PathBuf> {
    (format == OutputFormat::Pdf).then(|| summary_pdf_path(input))
}

/// `call.pdf` becomes `call.summary.pdf`, next to the input. The added
/// `.summary` keeps an uploaded PDF from being overwritten.
fn summary_pdf_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "summary".to_string());
    input.with_file_name(format!("{stem}.summary.pdf"))
}

fn emit(summary: &str, format: OutputFormat, config: &Config, output: Option<&Path>) -> Result<()> {
    let rendered = match format {
        OutputFormat::Text => tsb::summary_to_text(summary, config).into_bytes(),
        OutputFormat::Html => tsb::summary_to_html(summary, config).into_bytes(),
        OutputFormat::Typst => tsb::summary_to_typst(summary, config).into_bytes(),
        OutputFormat::Json => tsb::summary_to_json(summary)?.into_bytes(),
        OutputFormat::Pdf => tsb::summary_to_pdf(summary, config)?,
    };

    match output {
        Some(path) => {
            write_file(path, &rendered)?;
            println!("Created {}", path.display());
        }
        None => print!("{}", String::from_utf8_lossy(&rendered)),
    }
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn print_stats(stats: &SummaryStats) {
    println!("Original File Name: {}", stats.file_name);
    println!("File Word Count:    {}", stats.word_count_label());
    println!("Date Created:       {}", stats.date_created);
    println!();
}

fn print_library(records: &[&SummaryRecord]) {
    if records.is_empty() {
        println!("No summaries yet.");
        return;
    }

    println!(
        "{:<40} {:<12} {:>8}  {}",
        "Original File Name", "Date Uploaded", "Words", "Summary ID"
    );
    for record in records {
        let stats = record.stats();
        println!(
            "{:<40} {:<12} {:>8}  {}",
            truncate(&stats.file_name, 40),
            stats.date_created,
            stats.word_count,
            record.summary_id
        );
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(width - 1).collect();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("call.pdf", "call.summary.pdf")]
    #[case("notes/standup.txt", "notes/standup.summary.pdf")]
    #[case("response.json", "response.summary.pdf")]
    #[case("retro", "retro.summary.pdf")]
    fn pdf_path_never_replaces_input(#[case] input: &str, #[case] expected: &str) {
        let output = default_pdf_path(OutputFormat::Pdf, Path::new(input)).unwrap();
        assert_eq!(output, PathBuf::from(expected));
        assert_ne!(output, PathBuf::from(input));
    }

    #[test]
    fn only_pdf_gets_a_default_path() {
        for format in [OutputFormat::Text, OutputFormat::Html, OutputFormat::Typst, OutputFormat::Json] {
            assert_eq!(default_pdf_path(format, Path::new("call.pdf")), None);
        }
    }

    #[test]
    fn reads_trimmed_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.txt");
        fs::write(&path, "\n### Title\n- point\n\n").unwrap();

        assert_eq!(read_summary(&path).unwrap(), "### Title\n- point");
    }

    #[test]
    fn reads_summary_from_service_response() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("response.JSON");
        let response = SummarizeResponse {
            file_name: "call.txt".to_string(),
            text: "raw transcript".to_string(),
            word_count: 2,
            summary: "  **Gist**\n- ship it\n".to_string(),
            status: String::new(),
        };
        fs::write(&path, serde_json::to_string(&response).unwrap()).unwrap();

        assert_eq!(read_summary(&path).unwrap(), "**Gist**\n- ship it");
    }

    #[test]
    fn malformed_response_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("response.json");
        fs::write(&path, "{\"summary\": ").unwrap();

        assert!(matches!(read_summary(&path), Err(Error::Json(_))));
    }

    #[test]
    fn missing_input_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_summary(&dir.path().join("absent.txt")),
            Err(Error::Read { .. })
        ));
    }

    #[test]
    fn emit_writes_requested_format_to_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();

        let text_path = dir.path().join("out.txt");
        emit("- a\n---\nb", OutputFormat::Text, &config, Some(&text_path)).unwrap();
        assert_eq!(
            fs::read_to_string(&text_path).unwrap(),
            tsb::summary_to_text("- a\n---\nb", &config)
        );

        let json_path = dir.path().join("out.json");
        emit("### T", OutputFormat::Json, &config, Some(&json_path)).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value[0]["type"], "heading3");
    }

    #[test]
    fn emit_reports_unwritable_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.html");
        assert!(matches!(
            emit("text", OutputFormat::Html, &Config::default(), Some(&path)),
            Err(Error::Write { .. })
        ));
    }

    #[rstest]
    #[case("short.txt", 10, "short.txt")]
    #[case("exactly10!", 10, "exactly10!")]
    #[case("a_much_longer_name.pdf", 10, "a_much_lo…")]
    #[case("résumé_notes.txt", 7, "résumé…")]
    fn truncates_to_width(#[case] text: &str, #[case] width: usize, #[case] expected: &str) {
        assert_eq!(truncate(text, width), expected);
    }
}
