use media_plan::cli::run;
use media_plan::cli::Args;
use media_plan::cli::Outcome;
use media_plan::cli::Prompt;
use media_plan::extract_insertions;
use media_plan::output::sort_records;
use media_plan::output::write_csv;
use media_plan::spreadsheet::open_spreadsheet;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
<sheet name="Resumo" sheetId="1" r:id="rId1"/>
<sheet name="OPEN TV" sheetId="2" r:id="rId2"/>
</sheets>
</workbook>"#;

const RELATIONSHIPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>"#;

const SHARED_STRINGS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="2" uniqueCount="2">
<si><t>GLOBO</t></si>
<si><t>MARÇO</t></si>
</sst>"#;

const SUMMARY_SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>Resumo do plano</t></is></c><c r="B1"><v>12</v></c></row>
</sheetData></worksheet>"#;

fn text(reference: &str, value: &str) -> String {
    format!(r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#, reference, value)
}

fn number(reference: &str, value: f64) -> String {
    format!(r#"<c r="{}"><v>{}</v></c>"#, reference, value)
}

fn shared(reference: &str, index: usize) -> String {
    format!(r#"<c r="{}" t="s"><v>{}</v></c>"#, reference, index)
}

fn header(row: usize) -> String {
    [
        text(&format!("B{row}"), "REGION"),
        text(&format!("C{row}"), "CHANNEL"),
        text(&format!("D{row}"), "TV SHOW"),
        text(&format!("E{row}"), "DAYTIME"),
        text(&format!("J{row}"), "S04"),
        text(&format!("K{row}"), "S05"),
        text(&format!("AQ{row}"), "S01"),
    ]
    .concat()
}

/// Two monthly blocks: February labelled above the first header, March
/// (shared string with a diacritic) above the second.
fn plan_sheet() -> String {
    let rows = [
        (1, text("B1", "FEV")),
        (4, header(4)),
        (
            5,
            [
                text("B5", "SP"),
                shared("C5", 0),
                text("D5", "Novela X"),
                text("E5", "20:00 - 20:30"),
                number("K5", 3.0),
            ]
            .concat(),
        ),
        (
            6,
            [
                text("C6", "SBT"),
                text("D6", "Jornal"),
                text("E6", "12:00-12:30"),
                number("J6", 1.0),
            ]
            .concat(),
        ),
        (7, [text("B7", "TOTAL FEVEREIRO"), number("K7", 4.0)].concat()),
        (9, shared("B9", 1)),
        (10, header(10)),
        (
            11,
            [
                shared("C11", 0),
                text("D11", "Jornal"),
                text("E11", "06:00 - 07:00"),
                number("J11", 2.0),
                number("AQ11", 5.0),
            ]
            .concat(),
        ),
    ];
    let rows: String = rows
        .iter()
        .map(|(row, cells)| format!(r#"<row r="{}">{}</row>"#, row, cells))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        rows
    )
}

fn write_workbook(path: &Path) {
    let sheet = plan_sheet();
    let parts = [
        ("xl/workbook.xml", WORKBOOK),
        ("xl/_rels/workbook.xml.rels", RELATIONSHIPS),
        ("xl/sharedStrings.xml", SHARED_STRINGS),
        ("xl/worksheets/sheet1.xml", SUMMARY_SHEET),
        ("xl/worksheets/sheet2.xml", sheet.as_str()),
    ];
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    for (name, xml) in parts {
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

const EXPECTED_CSV: &str = "Canal,TV_Show,Data,Horario_inicial,Horario_final
SBT,Jornal,2025-02-04,12:00,12:30
GLOBO,Novela X,2025-02-05,20:00,20:30
GLOBO,Novela X,2025-02-05,20:00,20:30
GLOBO,Novela X,2025-02-05,20:00,20:30
GLOBO,Jornal,2025-03-04,06:00,07:00
GLOBO,Jornal,2025-03-04,06:00,07:00
";

struct NoPrompt;

impl Prompt for NoPrompt {
    fn ask(&mut self, question: &str) -> anyhow::Result<String> {
        anyhow::bail!("unexpected question: {}", question)
    }

    fn choose(&mut self, question: &str, _items: &[String]) -> anyhow::Result<Option<usize>> {
        anyhow::bail!("unexpected choice: {}", question)
    }
}

/// Answers questions in order; the file choice always picks the first item.
struct Answers(Vec<String>);

impl Prompt for Answers {
    fn ask(&mut self, question: &str) -> anyhow::Result<String> {
        if self.0.is_empty() {
            anyhow::bail!("unexpected question: {}", question);
        }
        Ok(self.0.remove(0))
    }

    fn choose(&mut self, _question: &str, items: &[String]) -> anyhow::Result<Option<usize>> {
        Ok((!items.is_empty()).then_some(0))
    }
}

fn batch_args(root: &Path, input: PathBuf, sheet: &str) -> Args {
    Args {
        input: Some(input),
        sheet: Some(sheet.to_owned()),
        input_dir: root.join("INPUT"),
        output_dir: root.join("OUTPUT"),
        no_prompt: true,
        ..Args::default()
    }
}

#[test]
fn library_pipeline() {
    let root = tempfile::tempdir().unwrap();
    let workbook = root.path().join("plano.xlsx");
    write_workbook(&workbook);

    let mut spreadsheet = open_spreadsheet(&workbook).unwrap();
    assert_eq!(spreadsheet.sheet_names(), vec!["Resumo".to_string(), "OPEN TV".to_string()]);
    let grid = spreadsheet.read_grid("OPEN TV").unwrap();
    let mut records = extract_insertions(&grid, 2025).unwrap();
    assert_eq!(records.len(), 6);

    sort_records(&mut records);
    let csv = root.path().join("out.csv");
    write_csv(&csv, &records).unwrap();
    assert_eq!(std::fs::read_to_string(&csv).unwrap(), EXPECTED_CSV);
}

#[test]
fn batch_run_writes_default_output() {
    let root = tempfile::tempdir().unwrap();
    let workbook = root.path().join("plano.xlsx");
    write_workbook(&workbook);

    let outcome = run(&batch_args(root.path(), workbook, "OPEN TV"), &mut NoPrompt).unwrap();
    let expected_path = root.path().join("OUTPUT").join("insercoes_plano_open_tv.csv");
    let months: BTreeMap<String, usize> = [("2025-02".to_string(), 4), ("2025-03".to_string(), 2)].into();
    assert_eq!(
        outcome,
        Outcome::Written {
            path: expected_path.clone(),
            rows: 6,
            months,
        }
    );
    assert_eq!(std::fs::read_to_string(&expected_path).unwrap(), EXPECTED_CSV);
}

#[test]
fn interactive_run_picks_from_input_folder() {
    let root = tempfile::tempdir().unwrap();
    let input_dir = root.path().join("INPUT");
    std::fs::create_dir_all(&input_dir).unwrap();
    write_workbook(&input_dir.join("plano.xlsx"));
    let output = root.path().join("custom.csv");

    let args = Args {
        input_dir,
        output_dir: root.path().join("OUTPUT"),
        ..Args::default()
    };
    let answers = ["", "OPEN TV", "2024", output.to_str().unwrap()];
    let mut answers = Answers(answers.iter().map(|answer| answer.to_string()).collect());
    let outcome = run(&args, &mut answers).unwrap();

    assert!(matches!(outcome, Outcome::Written { rows: 6, .. }));
    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.contains("GLOBO,Jornal,2024-03-04,06:00,07:00"));
    assert!(answers.0.is_empty());
}

#[test]
fn sheet_without_plan_fails() {
    let root = tempfile::tempdir().unwrap();
    let workbook = root.path().join("plano.xlsx");
    write_workbook(&workbook);

    let error = run(&batch_args(root.path(), workbook, "Resumo"), &mut NoPrompt).unwrap_err();
    assert_eq!(error.to_string(), "Nenhuma inserção encontrada. Verifique a aba ou formato.");
    assert!(!root.path().join("OUTPUT").join("insercoes_plano_resumo.csv").exists());
}

#[test]
fn unknown_sheet_fails() {
    let root = tempfile::tempdir().unwrap();
    let workbook = root.path().join("plano.xlsx");
    write_workbook(&workbook);

    assert!(run(&batch_args(root.path(), workbook, "Fev_25"), &mut NoPrompt).is_err());
}

#[test]
fn lists_sheets() {
    let root = tempfile::tempdir().unwrap();
    let workbook = root.path().join("plano.xlsx");
    write_workbook(&workbook);

    let args = Args {
        list_sheets: true,
        ..batch_args(root.path(), workbook, "")
    };
    assert_eq!(
        run(&args, &mut NoPrompt).unwrap(),
        Outcome::Sheets(vec!["Resumo".to_string(), "OPEN TV".to_string()])
    );
}
