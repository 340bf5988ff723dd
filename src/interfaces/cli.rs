// ============================================================
// COMMAND-LINE INTERFACE
// ============================================================
// Argument parsing and command dispatch. Flags override the layered
// configuration; dictionary edits go straight back to the JSON file.

use crate::application::use_cases::table_classifier::{ClassifiedTable, TableClassifier};
use crate::domain::classification::MatchMode;
use crate::domain::dictionary::Dictionary;
use crate::domain::error::{AppError, Result};
use crate::domain::table::Table;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv::CsvWriter;
use crate::infrastructure::dictionary_store;
use crate::infrastructure::json_report;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "lexitag")]
#[command(about = "Dictionary-based CSV statement classifier", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: lexitag.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a CSV file and write the augmented table
    Classify {
        /// Input CSV file
        #[arg(required = true)]
        input: PathBuf,

        /// Dictionary JSON file (default: built-in starter dictionary)
        #[arg(short, long)]
        dictionary: Option<PathBuf>,

        /// Output file (default: classified_data.csv or .json next to
        /// the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (csv/json)
        #[arg(short, long, default_value = "csv")]
        format: OutputFormat,

        /// Column holding the statements to classify
        #[arg(long)]
        column: Option<String>,

        /// Name of the appended categories column
        #[arg(long)]
        categories_column: Option<String>,

        /// Also append a single-label column with this name
        #[arg(long)]
        single_column: Option<String>,

        /// Separator between category names in the categories column
        #[arg(short, long)]
        separator: Option<String>,

        /// Matching mode (substring/whole-word)
        #[arg(short, long)]
        match_mode: Option<MatchMode>,

        /// CSV delimiter (default: detected from the input)
        #[arg(long)]
        delimiter: Option<char>,

        /// Print the first N augmented rows instead of writing output
        #[arg(short, long)]
        preview: Option<usize>,
    },

    /// Classify a CSV file and print the summary, writing nothing
    Analyze {
        /// Input CSV file
        #[arg(required = true)]
        input: PathBuf,

        /// Dictionary JSON file (default: built-in starter dictionary)
        #[arg(short, long)]
        dictionary: Option<PathBuf>,

        /// Column holding the statements to classify
        #[arg(long)]
        column: Option<String>,

        /// Matching mode (substring/whole-word)
        #[arg(short, long)]
        match_mode: Option<MatchMode>,
    },

    /// Inspect and edit dictionary files
    #[command(subcommand)]
    Dict(DictCommands),
}

#[derive(Subcommand)]
pub enum DictCommands {
    /// Write the starter dictionary to a file
    Init {
        /// Target file
        #[arg(short, long, default_value = "dictionary.json")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the categories and keywords of a dictionary
    Show {
        /// Dictionary JSON file
        path: PathBuf,
    },

    /// Add a category to a dictionary file
    AddCategory {
        /// Dictionary JSON file
        path: PathBuf,

        /// Category name
        name: String,

        /// Keywords, comma separated
        #[arg(short, long, value_delimiter = ',')]
        keywords: Vec<String>,
    },

    /// Remove a category from a dictionary file
    RemoveCategory {
        /// Dictionary JSON file
        path: PathBuf,

        /// Category name
        name: String,
    },

    /// Add a keyword to a category
    AddKeyword {
        /// Dictionary JSON file
        path: PathBuf,

        /// Category name
        category: String,

        /// Keyword to add
        keyword: String,
    },

    /// Remove a keyword from a category
    RemoveKeyword {
        /// Dictionary JSON file
        path: PathBuf,

        /// Category name
        category: String,

        /// Keyword to remove
        keyword: String,
    },
}

/// Output format for the classify command
#[derive(Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use csv or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Execute a parsed command line
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Classify {
            input,
            dictionary,
            output,
            format,
            column,
            categories_column,
            single_column,
            separator,
            match_mode,
            delimiter,
            preview,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(column) = column {
                config.statement_column = column;
            }
            if let Some(categories_column) = categories_column {
                config.categories_column = categories_column;
            }
            if let Some(single_column) = single_column {
                config.single_label_column = Some(single_column);
            }
            if let Some(separator) = separator {
                config.separator = separator;
            }
            if let Some(match_mode) = match_mode {
                config.match_mode = match_mode;
            }
            if let Some(delimiter) = delimiter {
                config.delimiter = Some(delimiter);
            }

            classify(&input, dictionary.as_deref(), output, format, preview, config)
        }

        Commands::Analyze {
            input,
            dictionary,
            column,
            match_mode,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(column) = column {
                config.statement_column = column;
            }
            if let Some(match_mode) = match_mode {
                config.match_mode = match_mode;
            }

            analyze(&input, dictionary.as_deref(), config)
        }

        Commands::Dict(command) => dict(command),
    }
}

fn load_config(config_file: Option<&Path>) -> Result<AppConfig> {
    match config_file {
        Some(path) => {
            if !path.exists() {
                return Err(AppError::NotFound(format!(
                    "Config file '{}' not found",
                    path.display()
                )));
            }
            AppConfig::load_from(path)
        }
        None => AppConfig::load(),
    }
}

fn load_dictionary(path: Option<&Path>) -> Result<Dictionary> {
    match path {
        Some(path) => dictionary_store::load_dictionary(path),
        None => {
            debug!("No dictionary given, using the built-in starter dictionary");
            Ok(Dictionary::starter())
        }
    }
}

fn classify(
    input: &Path,
    dictionary: Option<&Path>,
    output: Option<PathBuf>,
    format: OutputFormat,
    preview: Option<usize>,
    config: AppConfig,
) -> Result<()> {
    let dictionary = load_dictionary(dictionary)?;
    let pipeline = TableClassifier::new(config, dictionary)?;
    let classified = pipeline.classify_path(input)?;

    println!("{}", classified.summary);
    println!("Processed in {} ms", classified.processing_time_ms);

    if let Some(rows) = preview {
        let rendered = render_preview(&classified, rows)?;
        println!("\nPreview (first {} rows):\n{}", rows, rendered);
        return Ok(());
    }

    let output = output.unwrap_or_else(|| default_output_path(input, format));
    match format {
        OutputFormat::Csv => {
            CsvWriter::new()
                .with_delimiter(classified.delimiter)
                .write_path(&classified.table, &output)?;
        }
        OutputFormat::Json => {
            json_report::write_report(&pipeline.report(&classified), &output)?;
        }
    }

    println!("Wrote {}", output.display());
    Ok(())
}

fn analyze(input: &Path, dictionary: Option<&Path>, config: AppConfig) -> Result<()> {
    let dictionary = load_dictionary(dictionary)?;
    let pipeline = TableClassifier::new(config, dictionary)?;
    let classified = pipeline.classify_path(input)?;

    println!("{}", classified.summary);
    println!("Processed in {} ms", classified.processing_time_ms);
    Ok(())
}

fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    input.with_file_name(format!("classified_data.{}", format))
}

fn render_preview(classified: &ClassifiedTable, rows: usize) -> Result<String> {
    let mut preview = Table::new(classified.table.headers().to_vec());
    for row in classified.table.rows().iter().take(rows) {
        preview.push_row(row.cells.clone());
    }

    CsvWriter::new()
        .with_delimiter(classified.delimiter)
        .write_string(&preview)
}

fn dict(command: DictCommands) -> Result<()> {
    match command {
        DictCommands::Init { output, force } => {
            if output.exists() && !force {
                return Err(AppError::ValidationError(format!(
                    "File '{}' already exists (pass --force to overwrite)",
                    output.display()
                )));
            }

            let dictionary = Dictionary::starter();
            dictionary_store::save_dictionary(&dictionary, &output)?;
            println!(
                "Wrote starter dictionary with {} categories to {}",
                dictionary.len(),
                output.display()
            );
        }

        DictCommands::Show { path } => {
            let dictionary = dictionary_store::load_dictionary(&path)?;
            println!(
                "{} categories, {} keywords",
                dictionary.len(),
                dictionary.keyword_count()
            );
            for category in dictionary.categories() {
                println!(
                    "  {} ({}): {}",
                    category.name(),
                    category.keyword_count(),
                    category.keywords().join(", ")
                );
            }
        }

        DictCommands::AddCategory {
            path,
            name,
            keywords,
        } => {
            let mut dictionary = dictionary_store::load_dictionary(&path)?;
            dictionary.add_category(&name, keywords)?;
            dictionary_store::save_dictionary(&dictionary, &path)?;

            let added = dictionary.get(&name).map(|c| c.keyword_count()).unwrap_or(0);
            println!("Added category '{}' with {} keywords", name.trim(), added);
        }

        DictCommands::RemoveCategory { path, name } => {
            let mut dictionary = dictionary_store::load_dictionary(&path)?;
            let removed = dictionary.remove_category(&name)?;
            dictionary_store::save_dictionary(&dictionary, &path)?;
            println!("Removed category '{}'", removed.name());
        }

        DictCommands::AddKeyword {
            path,
            category,
            keyword,
        } => {
            let mut dictionary = dictionary_store::load_dictionary(&path)?;
            if dictionary.add_keyword(&category, &keyword)? {
                dictionary_store::save_dictionary(&dictionary, &path)?;
                println!("Added keyword '{}' to '{}'", keyword.trim(), category);
            } else {
                println!(
                    "Keyword '{}' is already present in '{}'",
                    keyword.trim(),
                    category
                );
            }
        }

        DictCommands::RemoveKeyword {
            path,
            category,
            keyword,
        } => {
            let mut dictionary = dictionary_store::load_dictionary(&path)?;
            dictionary.remove_keyword(&category, &keyword)?;
            dictionary_store::save_dictionary(&dictionary, &path)?;
            println!("Removed keyword '{}' from '{}'", keyword.trim(), category);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).unwrap()
    }

    #[test]
    fn test_parse_classify_defaults() {
        let cli = parse(&["lexitag", "classify", "input.csv"]);

        match cli.command {
            Commands::Classify {
                input,
                dictionary,
                output,
                format,
                preview,
                ..
            } => {
                assert_eq!(input, PathBuf::from("input.csv"));
                assert!(dictionary.is_none());
                assert!(output.is_none());
                assert!(matches!(format, OutputFormat::Csv));
                assert!(preview.is_none());
            }
            _ => panic!("Expected classify command"),
        }
    }

    #[test]
    fn test_parse_classify_with_overrides() {
        let cli = parse(&[
            "lexitag",
            "classify",
            "input.csv",
            "--dictionary",
            "dict.json",
            "--format",
            "json",
            "--column",
            "Text",
            "--match-mode",
            "whole-word",
            "--separator",
            " | ",
            "--preview",
            "5",
        ]);

        match cli.command {
            Commands::Classify {
                dictionary,
                format,
                column,
                match_mode,
                separator,
                preview,
                ..
            } => {
                assert_eq!(dictionary, Some(PathBuf::from("dict.json")));
                assert!(matches!(format, OutputFormat::Json));
                assert_eq!(column.as_deref(), Some("Text"));
                assert_eq!(match_mode, Some(MatchMode::WholeWord));
                assert_eq!(separator.as_deref(), Some(" | "));
                assert_eq!(preview, Some(5));
            }
            _ => panic!("Expected classify command"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_format() {
        let result = Cli::try_parse_from(["lexitag", "classify", "in.csv", "--format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_dict_add_category_splits_keywords() {
        let cli = parse(&[
            "lexitag",
            "dict",
            "add-category",
            "dict.json",
            "Finance",
            "--keywords",
            "invoice,payment,budget",
        ]);

        match cli.command {
            Commands::Dict(DictCommands::AddCategory { keywords, name, .. }) => {
                assert_eq!(name, "Finance");
                assert_eq!(keywords, vec!["invoice", "payment", "budget"]);
            }
            _ => panic!("Expected dict add-category command"),
        }
    }

    #[test]
    fn test_default_output_path() {
        let path = default_output_path(Path::new("data/input.csv"), OutputFormat::Csv);
        assert_eq!(path, PathBuf::from("data/classified_data.csv"));

        let path = default_output_path(Path::new("input.csv"), OutputFormat::Json);
        assert_eq!(path, PathBuf::from("classified_data.json"));
    }

    #[test]
    fn test_dict_init_and_show_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary.json");

        dict(DictCommands::Init {
            output: path.clone(),
            force: false,
        })
        .unwrap();

        let dictionary = dictionary_store::load_dictionary(&path).unwrap();
        assert!(!dictionary.is_empty());
        assert!(dictionary.get("scarcity").is_some());

        // A second init without --force must refuse to overwrite
        let err = dict(DictCommands::Init {
            output: path.clone(),
            force: false,
        })
        .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_dict_edit_commands_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary.json");
        std::fs::write(&path, r#"{"Finance": ["invoice"]}"#).unwrap();

        dict(DictCommands::AddCategory {
            path: path.clone(),
            name: "HR".to_string(),
            keywords: vec!["leave".to_string()],
        })
        .unwrap();

        dict(DictCommands::AddKeyword {
            path: path.clone(),
            category: "Finance".to_string(),
            keyword: "payment".to_string(),
        })
        .unwrap();

        dict(DictCommands::RemoveKeyword {
            path: path.clone(),
            category: "Finance".to_string(),
            keyword: "invoice".to_string(),
        })
        .unwrap();

        let dictionary = dictionary_store::load_dictionary(&path).unwrap();
        assert_eq!(dictionary.category_names(), vec!["Finance", "HR"]);
        assert_eq!(dictionary.get("Finance").unwrap().keywords(), &["payment"]);

        dict(DictCommands::RemoveCategory {
            path: path.clone(),
            name: "HR".to_string(),
        })
        .unwrap();
        let dictionary = dictionary_store::load_dictionary(&path).unwrap();
        assert_eq!(dictionary.len(), 1);
    }

    #[test]
    fn test_classify_writes_augmented_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.csv");
        let dict_path = dir.path().join("dict.json");
        let output = dir.path().join("out.csv");

        std::fs::write(&input, "ID,Statement\n1,invoice sent\n2,nothing\n").unwrap();
        std::fs::write(&dict_path, r#"{"Finance": ["invoice"]}"#).unwrap();

        classify(
            &input,
            Some(&dict_path),
            Some(output.clone()),
            OutputFormat::Csv,
            None,
            AppConfig::default(),
        )
        .unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("ID,Statement,Categories\n"));
        assert!(written.contains("1,invoice sent,Finance\n"));
        assert!(written.contains("2,nothing,\n"));
    }

    #[test]
    fn test_classify_json_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.csv");
        let dict_path = dir.path().join("dict.json");
        let output = dir.path().join("out.json");

        std::fs::write(&input, "Statement\ninvoice sent\n").unwrap();
        std::fs::write(&dict_path, r#"{"Finance": ["invoice"]}"#).unwrap();

        classify(
            &input,
            Some(&dict_path),
            Some(output.clone()),
            OutputFormat::Json,
            None,
            AppConfig::default(),
        )
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(value["records"][0]["categories"][0], "Finance");
    }

    #[test]
    fn test_classify_flag_overrides_config_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("lexitag.toml", r#"statement_column = "Text""#)?;
            jail.create_file("input.csv", "ID,Remark\n1,invoice sent\n")?;
            jail.create_file("dict.json", r#"{"Finance": ["invoice"]}"#)?;

            // Without the flag, the configured column applies and is
            // missing from this input
            let err = run(parse(&[
                "lexitag", "classify", "input.csv", "-d", "dict.json", "-o", "out.csv",
            ]))
            .unwrap_err();
            assert!(err.to_string().contains("Column 'Text' not found"));

            // --column must beat the value from lexitag.toml
            run(parse(&[
                "lexitag",
                "classify",
                "input.csv",
                "-d",
                "dict.json",
                "-o",
                "out.csv",
                "--column",
                "Remark",
            ]))
            .unwrap();

            let written = std::fs::read_to_string("out.csv").unwrap();
            assert!(written.starts_with("ID,Remark,Categories\n"));
            assert!(written.contains("1,invoice sent,Finance\n"));
            Ok(())
        });
    }

    #[test]
    fn test_render_preview_truncates_rows() {
        let dictionary =
            Dictionary::from_entries(vec![("Finance".to_string(), vec!["invoice".to_string()])])
                .unwrap();
        let pipeline = TableClassifier::new(AppConfig::default(), dictionary).unwrap();
        let classified = pipeline
            .classify_content("Statement\ninvoice one\ninvoice two\ninvoice three\n")
            .unwrap();

        let rendered = render_preview(&classified, 2).unwrap();
        assert!(rendered.starts_with("Statement,Categories\n"));
        assert!(rendered.contains("invoice one,Finance\n"));
        assert!(rendered.contains("invoice two,Finance\n"));
        assert!(!rendered.contains("invoice three"));
    }

    #[test]
    fn test_classify_preview_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.csv");
        std::fs::write(&input, "Statement\ninvoice sent\n").unwrap();

        classify(
            &input,
            None,
            None,
            OutputFormat::Csv,
            Some(1),
            AppConfig::default(),
        )
        .unwrap();

        assert!(!dir.path().join("classified_data.csv").exists());
    }
}
