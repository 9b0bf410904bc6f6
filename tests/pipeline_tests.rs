// Integration tests for the load -> analyze -> present pipeline

use catalog_insights::charts::{ChartTheme, StaticChartRenderer};
use catalog_insights::data::{load_dataset, LoaderError, TitleType};
use catalog_insights::questions::{analyze_all, AnalysisSettings, Question, Summary};
use catalog_insights::report::write_analysis;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CATALOG_CSV: &str = "\
title,type,countries,rating,release_year,duration,date_added,directors
Alpha,Movie,\"India, United States\",PG-13,2019,90 min,\"January 5, 2020\",\"Ana Ruiz, Bo Chen\"
Beta,TV Show,United States,TV-MA,2020,2 Seasons,\"March 1, 2021\",
Gamma,Movie,,PG-13,2015,120 min,\"January 20, 2020\",Bo Chen
Delta,TV Show,India,TV-14,2018,1 Season,\"December 31, 2019\",
Epsilon,Movie,United Kingdom,R,2021,,\"not a date\",Ana Ruiz
Zeta,Documentary,India,TV-G,2017,45 min,\"May 2, 2019\",
Eta,Movie,India,R,unknown,100 min,\"May 2, 2019\",
Theta,Movie,\"United States, Canada\",,2010,75 min,\"July 4, 2018\",Cy Park
";

fn write_catalog(dir: &Path) -> PathBuf {
    let path = dir.join("titles.csv");
    fs::write(&path, CATALOG_CSV).unwrap();
    path
}

fn counts(summary: &Summary) -> Vec<(String, usize)> {
    match summary {
        Summary::Counts { entries } => entries
            .iter()
            .map(|e| (e.label.clone(), e.count))
            .collect(),
        other => panic!("expected counts, got {:?}", other),
    }
}

#[test]
fn test_load_dataset_skips_unusable_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(dir.path());

    let dataset = load_dataset(&[path.clone()]).unwrap();
    assert_eq!(dataset.path, path);
    assert_eq!(dataset.records.len(), 6);
    assert_eq!(dataset.skipped_rows, 2);
    assert_eq!(
        dataset
            .records
            .iter()
            .filter(|r| r.is(TitleType::TvShow))
            .count(),
        2
    );
}

#[test]
fn test_load_dataset_uses_first_existing_candidate() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(dir.path());
    let missing = dir.path().join("missing.csv");

    let dataset = load_dataset(&[missing, path.clone()]).unwrap();
    assert_eq!(dataset.path, path);
}

#[test]
fn test_missing_dataset_lists_tried_paths() {
    let dir = TempDir::new().unwrap();
    let candidates = vec![dir.path().join("a.csv"), dir.path().join("b.csv")];

    match load_dataset(&candidates) {
        Err(LoaderError::DatasetNotFound { tried }) => assert_eq!(tried, candidates),
        other => panic!("expected DatasetNotFound, got {:?}", other.map(|d| d.path)),
    }
}

#[test]
fn test_missing_column_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("titles.csv");
    fs::write(&path, "title,type,release_year\nAlpha,Movie,2020\n").unwrap();

    match load_dataset(&[path]) {
        Err(LoaderError::MissingColumn(column)) => assert_eq!(column, "countries"),
        other => panic!("expected MissingColumn, got {:?}", other.map(|d| d.path)),
    }
}

#[test]
fn test_questions_over_loaded_catalog() {
    let dir = TempDir::new().unwrap();
    let dataset = load_dataset(&[write_catalog(dir.path())]).unwrap();
    let settings = AnalysisSettings::default();

    let analyses = analyze_all(&dataset.records, &settings);
    assert_eq!(analyses.len(), 15);

    let top_countries = &analyses[1];
    assert_eq!(top_countries.question, Question::TopCountries);
    assert_eq!(
        counts(&top_countries.summary),
        vec![
            ("India".to_string(), 2),
            ("United States".to_string(), 2),
            ("Unknown".to_string(), 1),
            ("United Kingdom".to_string(), 1),
        ]
    );

    let directors = counts(&analyses[9].summary);
    assert_eq!(directors[0], ("Ana Ruiz".to_string(), 2));
    assert_eq!(directors[1], ("Bo Chen".to_string(), 2));

    let seasons = counts(&Question::TvSeasons.analyze(&dataset.records, &settings).summary);
    assert_eq!(seasons, vec![("1".to_string(), 1), ("2".to_string(), 1)]);

    let yearly = counts(&analyses[10].summary);
    assert_eq!(
        yearly,
        vec![
            ("2018".to_string(), 1),
            ("2019".to_string(), 1),
            ("2020".to_string(), 2),
            ("2021".to_string(), 1),
        ]
    );
}

#[test]
fn test_render_every_question_to_svg() {
    let dir = TempDir::new().unwrap();
    let dataset = load_dataset(&[write_catalog(dir.path())]).unwrap();
    let out_dir = dir.path().join("charts");
    let renderer = StaticChartRenderer::new(ChartTheme::default(), out_dir.clone());

    for analysis in analyze_all(&dataset.records, &AnalysisSettings::default()) {
        let path = renderer.render(&analysis).unwrap();
        assert_eq!(path, out_dir.join(format!("{}.svg", analysis.file_stem())));
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"), "{:?} is not an SVG", path);
    }

    assert!(out_dir.join("q01_content_type_mix.svg").is_file());
    assert!(out_dir.join("q15_top_country_breakdown.svg").is_file());
}

#[test]
fn test_render_empty_catalog() {
    let dir = TempDir::new().unwrap();
    let renderer = StaticChartRenderer::new(ChartTheme::default(), dir.path());

    for analysis in analyze_all(&[], &AnalysisSettings::default()) {
        let path = renderer.render(&analysis).unwrap();
        assert!(path.is_file());
    }
}

#[test]
fn test_console_report_for_all_questions() {
    let dir = TempDir::new().unwrap();
    let dataset = load_dataset(&[write_catalog(dir.path())]).unwrap();

    let mut buf = Vec::new();
    for analysis in analyze_all(&dataset.records, &AnalysisSettings::default()) {
        write_analysis(&mut buf, &analysis).unwrap();
    }
    let output = String::from_utf8(buf).unwrap();

    for question in Question::ALL {
        let heading = format!("QUESTION {}: {}", question.number(), question.title());
        assert!(output.contains(&heading), "missing {}", heading);
    }
}

#[test]
fn test_json_summary() {
    let dir = TempDir::new().unwrap();
    let dataset = load_dataset(&[write_catalog(dir.path())]).unwrap();

    let analysis = Question::ContentTypeMix.analyze(&dataset.records, &AnalysisSettings::default());
    let value: serde_json::Value = serde_json::from_str(&analysis.to_json().unwrap()).unwrap();

    assert_eq!(value["number"], 1);
    assert_eq!(value["question"], "content_type_mix");
    assert_eq!(value["summary"]["kind"], "shares");
    assert_eq!(value["summary"]["entries"][0]["label"], "Movie");
    assert_eq!(value["summary"]["entries"][0]["count"], 4);
}
