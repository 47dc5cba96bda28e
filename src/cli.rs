//! Command line front end. Values not given as flags are asked for
//! interactively, the way the plan team runs the tool by hand.
use crate::config::Directories;
use crate::config::DEFAULT_INPUT_DIR;
use crate::config::DEFAULT_OUTPUT_DIR;
use crate::config::DEFAULT_YEAR;
use crate::error::ResultMessage;
use crate::output::month_summary;
use crate::output::sort_records;
use crate::output::write_csv;
use crate::plan::extract_insertions;
use crate::spreadsheet::open_spreadsheet;
use anyhow::bail;
use anyhow::Context;
use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Extract TV ad insertions from a spreadsheet media plan into a CSV file
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Workbook to read (.xlsx or .xlsm)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Sheet holding the plan, e.g. "OPEN TV"
    #[arg(short, long)]
    pub sheet: Option<String>,

    /// Year of the plan dates
    #[arg(short, long)]
    pub year: Option<i32>,

    /// CSV file to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Folder listed when no workbook is given
    #[arg(long, default_value = DEFAULT_INPUT_DIR)]
    pub input_dir: PathBuf,

    /// Folder of the default CSV path
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Print the sheet names of the workbook and exit
    #[arg(long)]
    pub list_sheets: bool,

    /// Never ask; missing values fall back to defaults or fail
    #[arg(long)]
    pub no_prompt: bool,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn directories(&self) -> Directories {
        Directories {
            input: self.input_dir.clone(),
            output: self.output_dir.clone(),
        }
    }

    /// Log filter for the verbosity flag.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}

/// Source of interactive answers.
pub trait Prompt {
    /// Asks a free-text question; an empty answer is allowed.
    fn ask(&mut self, question: &str) -> anyhow::Result<String>;

    /// Lets the user pick one of `items`, `None` when the choice is aborted.
    fn choose(&mut self, question: &str, items: &[String]) -> anyhow::Result<Option<usize>>;
}

/// Prompts on the terminal.
pub struct Terminal;

impl Prompt for Terminal {
    fn ask(&mut self, question: &str) -> anyhow::Result<String> {
        let answer = dialoguer::Input::<String>::new()
            .with_prompt(question)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer.trim().to_owned())
    }

    fn choose(&mut self, question: &str, items: &[String]) -> anyhow::Result<Option<usize>> {
        let choice = dialoguer::Select::new()
            .with_prompt(question)
            .items(items)
            .default(0)
            .interact_opt()?;
        Ok(choice)
    }
}

/// What a finished run produced.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Sheets(Vec<String>),
    Written {
        path: PathBuf,
        rows: usize,
        months: BTreeMap<String, usize>,
    },
}

/// Runs one extraction. Every error ends the program with exit code 1.
pub fn run(args: &Args, prompt: &mut dyn Prompt) -> anyhow::Result<Outcome> {
    let directories = args.directories();
    directories
        .create()
        .with_context(|| format!("Não foi possível criar {} ou {}", directories.input.display(), directories.output.display()))?;

    let input = match &args.input {
        Some(input) => input.clone(),
        None if args.no_prompt => bail!("Nenhum arquivo informado. Use --input."),
        None => ask_input(&directories, prompt)?,
    };
    if !input.exists() {
        bail!("Arquivo não encontrado: {}", input.display());
    }
    let mut spreadsheet = open_spreadsheet(&input).with_prefix(&input.display().to_string())?;
    if args.list_sheets {
        return Ok(Outcome::Sheets(spreadsheet.sheet_names()));
    }

    let sheet = match &args.sheet {
        Some(sheet) => sheet.trim().to_owned(),
        None if args.no_prompt => String::new(),
        None => prompt.ask("Nome da aba (ex: 'OPEN TV', 'OPEN TV - GLOBO')")?,
    };
    if sheet.is_empty() {
        bail!("Nenhuma aba informada. Encerrando.");
    }

    let year = match args.year {
        Some(year) => year,
        None if args.no_prompt => DEFAULT_YEAR,
        None => ask_year(prompt)?,
    };

    println!("Lendo planilha...");
    let grid = spreadsheet.read_grid(&sheet).with_prefix(&spreadsheet.name())?;
    println!("Processando inserções...");
    let mut records = extract_insertions(&grid, year)
        .with_context(|| "Nenhuma inserção encontrada. Verifique a aba ou formato.")?;

    let default_output = directories.default_output(&input, &sheet);
    let output = match &args.output {
        Some(output) => output.clone(),
        None if args.no_prompt => default_output,
        None => {
            let answer = prompt.ask(&format!("Salvar CSV em (padrão {})", default_output.display()))?;
            if answer.is_empty() {
                default_output
            } else {
                PathBuf::from(answer)
            }
        }
    };
    log::info!(
        "Sheet '{}' of {} for {} into {}",
        sheet,
        input.display(),
        year,
        output.display()
    );

    sort_records(&mut records);
    write_csv(&output, &records)?;
    Ok(Outcome::Written {
        path: output,
        rows: records.len(),
        months: month_summary(&records),
    })
}

/// Asks for a workbook path; a blank answer lists the input folder.
fn ask_input(directories: &Directories, prompt: &mut dyn Prompt) -> anyhow::Result<PathBuf> {
    let input_dir = &directories.input;
    let shown = input_dir.canonicalize().unwrap_or_else(|_| input_dir.clone());
    println!("Coloque seus .xlsx em: {}", shown.display());

    let answer = prompt.ask(&format!("Caminho do arquivo Excel (Enter para listar {})", input_dir.display()))?;
    if !answer.is_empty() {
        return Ok(PathBuf::from(answer));
    }

    let files = directories.list_workbooks()?;
    if files.is_empty() {
        bail!(
            "Nenhum .xlsx encontrado em {}. Informe um caminho completo.",
            input_dir.display()
        );
    }
    let names: Vec<String> = files
        .iter()
        .map(|file| file.file_name().map(|name| name.to_string_lossy().to_string()).unwrap_or_default())
        .collect();
    match prompt.choose("Escolha o arquivo", &names)? {
        Some(index) if index < files.len() => Ok(files[index].clone()),
        _ => bail!("Escolha inválida."),
    }
}

fn ask_year(prompt: &mut dyn Prompt) -> anyhow::Result<i32> {
    let answer = prompt.ask(&format!("Ano (YYYY, Enter para padrão {})", DEFAULT_YEAR))?;
    Ok(crate::config::parse_year(&answer).unwrap_or_else(|_| {
        eprintln!("Ano inválido, usando {}.", DEFAULT_YEAR);
        DEFAULT_YEAR
    }))
}

/// Prints the result of a run the way users read it on the console.
pub fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Sheets(names) => {
            for name in names {
                println!("{}", name);
            }
        }
        Outcome::Written { path, rows, months } => {
            println!("Salvo {} linhas em {}", rows, path.display());
            println!("Distribuição por mês:");
            for (month, count) in months {
                println!("  {}: {}", month, count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays canned answers in order.
    #[derive(Default)]
    struct Script {
        answers: VecDeque<String>,
        choices: VecDeque<Option<usize>>,
        questions: Vec<String>,
    }

    impl Script {
        fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|answer| answer.to_string()).collect(),
                ..Self::default()
            }
        }
    }

    impl Prompt for Script {
        fn ask(&mut self, question: &str) -> anyhow::Result<String> {
            self.questions.push(question.to_owned());
            self.answers
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("unexpected question: {}", question))
        }

        fn choose(&mut self, question: &str, _items: &[String]) -> anyhow::Result<Option<usize>> {
            self.questions.push(question.to_owned());
            self.choices
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("unexpected choice: {}", question))
        }
    }

    fn args(root: &std::path::Path) -> Args {
        Args {
            input_dir: root.join("INPUT"),
            output_dir: root.join("OUTPUT"),
            ..Args::default()
        }
    }

    #[test]
    fn parses_flags() {
        let args = Args::parse_from([
            "media-plan",
            "--input",
            "INPUT/plan.xlsx",
            "--sheet",
            "OPEN TV",
            "-y",
            "2024",
            "--no-prompt",
            "-vv",
        ]);
        assert_eq!(args.input, Some(PathBuf::from("INPUT/plan.xlsx")));
        assert_eq!(args.sheet.as_deref(), Some("OPEN TV"));
        assert_eq!(args.year, Some(2024));
        assert_eq!(args.input_dir, PathBuf::from("INPUT"));
        assert_eq!(args.output_dir, PathBuf::from("OUTPUT"));
        assert!(args.no_prompt);
        assert_eq!(args.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn quiet_by_default() {
        let args = Args::parse_from(["media-plan"]);
        assert_eq!(args.log_level(), log::LevelFilter::Warn);
        assert!(!args.list_sheets);
    }

    #[test]
    fn creates_folders() {
        let root = tempfile::tempdir().unwrap();
        let args = Args {
            no_prompt: true,
            ..args(root.path())
        };
        assert!(run(&args, &mut Script::default()).is_err());
        assert!(root.path().join("INPUT").is_dir());
        assert!(root.path().join("OUTPUT").is_dir());
    }

    #[test]
    fn missing_file() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("nope.xlsx");
        let mut script = Script::new(&[missing.to_str().unwrap()]);
        let error = run(&args(root.path()), &mut script).unwrap_err();
        assert!(error.to_string().starts_with("Arquivo não encontrado"));
    }

    #[test]
    fn empty_input_folder() {
        let root = tempfile::tempdir().unwrap();
        let mut script = Script::new(&[""]);
        let error = run(&args(root.path()), &mut script).unwrap_err();
        assert!(error.to_string().starts_with("Nenhum .xlsx encontrado"));
    }

    #[test]
    fn aborted_choice() {
        let root = tempfile::tempdir().unwrap();
        let args = args(root.path());
        args.directories().create().unwrap();
        std::fs::write(root.path().join("INPUT").join("plan.xlsx"), b"").unwrap();
        let mut script = Script::new(&[""]);
        script.choices.push_back(None);
        let error = run(&args, &mut script).unwrap_err();
        assert_eq!(error.to_string(), "Escolha inválida.");
    }

    #[test]
    fn invalid_year_falls_back() {
        let mut script = Script::new(&["20x5"]);
        assert_eq!(ask_year(&mut script).unwrap(), DEFAULT_YEAR);
        let mut script = Script::new(&["2023"]);
        assert_eq!(ask_year(&mut script).unwrap(), 2023);
    }
}
