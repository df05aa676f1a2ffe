//! docmark - markdown ↔ Google Docs converter

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use docmark_config::Config;
use docmark_engine::model::Document;
use docmark_engine::{
    RenderOptions, extract_markdown, extract_plain_text, list_tabs, render_markdown, resolve,
};

#[derive(Parser)]
#[command(name = "docmark")]
#[command(version, about = "Convert between markdown and Google Docs", long_about = None)]
#[command(after_help = "EXAMPLES:
    docmark render notes.md                 Print the batchUpdate body for notes.md
    docmark render - --start-index 42       Render stdin for insertion at index 42
    docmark extract doc.json --tab-id t.1   Rebuild markdown from one tab
    docmark tabs doc.json                   List every tab of a document
    docmark init                            Write the default config file")]
struct Cli {
    /// Config file to use instead of ~/.config/docmark/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render markdown into batchUpdate requests
    Render {
        /// Markdown file, or - for stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Document index of the first insertion
        #[arg(long, default_value_t = 1)]
        start_index: usize,

        /// Tab the requests address
        #[arg(long)]
        tab_id: Option<String>,

        /// Insert a paragraph break before the content
        #[arg(long)]
        prepend_newline: bool,
    },

    /// Rebuild markdown from a document JSON
    Extract {
        /// Document JSON file, or - for stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Tab to read; defaults to the first tab
        #[arg(long)]
        tab_id: Option<String>,

        /// Emit paragraph text without markdown
        #[arg(long)]
        plain: bool,
    },

    /// List a document's tabs as JSON
    Tabs {
        /// Document JSON file, or - for stdin
        #[arg(value_name = "INPUT")]
        input: String,
    },

    /// Write the default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    match cli.command {
        Command::Render {
            input,
            start_index,
            tab_id,
            prepend_newline,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let markdown = read_input(&input)?;
            let options = RenderOptions::at(start_index)
                .with_tab_id(tab_id)
                .with_prepend_newline(prepend_newline)
                .with_code_block(config.code_block.to_style());
            render(&markdown, &options)
        }
        Command::Extract {
            input,
            tab_id,
            plain,
        } => {
            let doc = parse_document(&read_input(&input)?, &input)?;
            extract(&doc, tab_id.as_deref(), plain)
        }
        Command::Tabs { input } => {
            let doc = parse_document(&read_input(&input)?, &input)?;
            Ok(serde_json::to_string_pretty(&list_tabs(&doc))?)
        }
        Command::Init { force } => {
            let path = match cli.config {
                Some(path) => Config::expand_path(&path),
                None => Config::config_path(),
            };
            init_config(&path, force)
        }
    }
}

/// Loads the config at `path`, or the default location, falling back to
/// built-in defaults when no file exists.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let loaded = match path {
        Some(path) => {
            let path = Config::expand_path(path);
            log::info!("Config path: {}", path.display());
            Config::load_from_path(&path)?
        }
        None => Config::load()?,
    };
    if loaded.is_none() {
        log::info!("No config file found, using defaults");
    }
    Ok(loaded.unwrap_or_default())
}

/// Writes the built-in defaults to `path`, refusing to clobber an existing
/// file unless `force` is set.
fn init_config(path: &Path, force: bool) -> Result<String> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}; pass --force to overwrite",
            path.display()
        );
    }
    Config::default()
        .save_to_path(path)
        .with_context(|| format!("Failed to write config file at {}", path.display()))?;
    log::info!("Wrote default config to {}", path.display());
    Ok(format!("Wrote default config to {}", path.display()))
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
}

fn parse_document(json: &str, source: &str) -> Result<Document> {
    Document::from_json(json)
        .with_context(|| format!("Failed to parse document JSON from {source}"))
}

fn render(markdown: &str, options: &RenderOptions) -> Result<String> {
    let batch = render_markdown(markdown, options);
    log::info!(
        "Rendered {} requests ending at index {}",
        batch.requests.len(),
        batch.cursor
    );
    Ok(serde_json::to_string_pretty(&batch.into_batch_update())?)
}

fn extract(doc: &Document, tab_id: Option<&str>, plain: bool) -> Result<String> {
    let target = resolve(doc, tab_id)?;
    let Some(body) = target.body(doc) else {
        log::warn!("Document has no body content");
        return Ok(String::new());
    };
    Ok(if plain {
        extract_plain_text(body)
    } else {
        extract_markdown(body)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const TABBED: &str = r#"{
        "documentId": "d1",
        "title": "Doc",
        "tabs": [
            {
                "tabProperties": {"tabId": "t.0", "title": "First"},
                "documentTab": {"body": {"content": [
                    {"endIndex": 7, "paragraph": {
                        "elements": [{"textRun": {"content": "Intro\n"}}],
                        "paragraphStyle": {"namedStyleType": "HEADING_2"}
                    }}
                ]}},
                "childTabs": [
                    {
                        "tabProperties": {"tabId": "t.1", "title": "Child"},
                        "documentTab": {"body": {"content": [
                            {"endIndex": 8, "paragraph": {
                                "elements": [{"textRun": {"content": "nested\n"}}]
                            }}
                        ]}}
                    }
                ]
            }
        ]
    }"#;

    fn tabbed() -> Document {
        parse_document(TABBED, "test").unwrap()
    }

    #[test]
    fn cli_parses_render_flags() {
        let cli = Cli::try_parse_from([
            "docmark",
            "render",
            "-",
            "--start-index",
            "42",
            "--tab-id",
            "t.1",
            "--prepend-newline",
            "--config",
            "/tmp/docmark.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/docmark.toml")));
        let Command::Render {
            input,
            start_index,
            tab_id,
            prepend_newline,
        } = cli.command
        else {
            panic!("expected render");
        };
        assert_eq!(input, "-");
        assert_eq!(start_index, 42);
        assert_eq!(tab_id.as_deref(), Some("t.1"));
        assert!(prepend_newline);
    }

    #[test]
    fn render_prints_a_batch_update_body() {
        let output = render("# Hi\n", &RenderOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let requests = value["requests"].as_array().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0]["insertText"]["text"], "Hi\n");
        assert_eq!(
            requests[1]["updateParagraphStyle"]["paragraphStyle"]["namedStyleType"],
            "HEADING_1"
        );
    }

    #[test]
    fn render_addresses_the_requested_tab() {
        let options = RenderOptions::at(5)
            .with_tab_id(Some("t.1".to_string()))
            .with_prepend_newline(true);
        let output = render("text\n", &options).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let first = &value["requests"][0]["insertText"];
        assert_eq!(first["text"], "\n");
        assert_eq!(first["location"]["index"], 5);
        assert_eq!(first["location"]["tabId"], "t.1");
    }

    #[test]
    fn extract_defaults_to_the_first_tab() {
        assert_eq!(extract(&tabbed(), None, false).unwrap(), "## Intro");
        assert_eq!(extract(&tabbed(), Some("t.1"), false).unwrap(), "nested");
        assert_eq!(extract(&tabbed(), None, true).unwrap(), "Intro");
    }

    #[test]
    fn extract_reports_an_unknown_tab() {
        let err = extract(&tabbed(), Some("t.7"), false).unwrap_err();
        assert_eq!(err.to_string(), "Tab 't.7' not found in document.");
    }

    #[test]
    fn bad_document_json_names_its_source() {
        let err = parse_document("{not json", "broken.json").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to parse document JSON from broken.json"
        );
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(Some(temp_dir.path().join("absent.toml").as_path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn config_code_block_reaches_the_renderer() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[code_block]\nfont_family = \"Ubuntu Mono\"\nbackground = 0.9\n",
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        let options = RenderOptions::default().with_code_block(config.code_block.to_style());
        let output = render("```\nx\n```\n", &options).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let font = value["requests"]
            .as_array()
            .unwrap()
            .iter()
            .find_map(|r| {
                r["updateTextStyle"]["textStyle"]["weightedFontFamily"]["fontFamily"].as_str()
            })
            .unwrap();
        assert_eq!(font, "Ubuntu Mono");
    }

    #[test]
    fn config_code_block_that_reads_back_as_prose_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[code_block]\nfont_family = \"Iosevka\"\n").unwrap();

        let err = load_config(Some(path.as_path())).unwrap_err();
        assert!(err.to_string().starts_with("Invalid [code_block] in config file at"));
        assert!(err.to_string().contains("Iosevka"));
    }

    #[test]
    fn init_writes_loadable_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/config.toml");

        let message = init_config(&path, false).unwrap();
        assert!(message.starts_with("Wrote default config to"));
        assert_eq!(load_config(Some(path.as_path())).unwrap(), Config::default());
    }

    #[test]
    fn init_keeps_an_existing_file_unless_forced() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[code_block]\nfont_size_pt = 12.0\n").unwrap();

        let err = init_config(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[code_block]\nfont_size_pt = 12.0\n"
        );

        init_config(&path, true).unwrap();
        assert_eq!(load_config(Some(path.as_path())).unwrap(), Config::default());
    }

    #[test]
    fn cli_parses_init_force() {
        let cli = Cli::try_parse_from(["docmark", "init", "--force"]).unwrap();
        assert!(matches!(cli.command, Command::Init { force: true }));
    }

    #[test]
    fn read_input_names_a_missing_file() {
        let err = read_input("/definitely/not/here.md").unwrap_err();
        assert_eq!(err.to_string(), "Failed to read /definitely/not/here.md");
    }
}
