use adforge::config::ExportConfig;
use adforge::editor::csv_io::BOM;
use adforge::editor::{
    COLUMN_COUNT, CsvRow, EDITOR_COLUMNS, RowType, compile, compile_detailed, parse_csv,
};
use adforge::model::{Ad, AdGroup, Campaign, CampaignStructure, Keyword, RsaAd};
use adforge::pipeline::{ExportSpec, render_export, run_export, validate_rows};
use adforge::structure::{StructureSettings, StructureType, build};
use chrono::NaiveDate;
use std::collections::HashSet;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date")
}

fn skag_settings() -> StructureSettings {
    StructureSettings {
        structure_type: StructureType::Skag,
        campaign_name: "Plumbing".to_owned(),
        url: "https://plumbing.example.com".to_owned(),
        ..StructureSettings::default()
    }
}

fn types(rows: &[CsvRow]) -> Vec<RowType> {
    rows.iter().filter_map(CsvRow::row_type).collect()
}

fn read_keyword_fixture() -> Vec<Keyword> {
    std::fs::read_to_string("testdata/plumbing.keywords.txt")
        .expect("read keyword fixture")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Keyword::from)
        .collect()
}

#[test]
fn test_skag_single_keyword_end_to_end() {
    let structure = build(&[Keyword::from("plumber near me")], &skag_settings());
    let export = render_export(&structure, &ExportConfig::default(), today()).expect("render");

    assert_eq!(export.filename, "plumbing_google_ads_editor_2024-03-09.csv");
    assert!(export.validation.is_valid, "{:?}", export.validation.errors);

    let parsed = parse_csv(&export.csv).expect("parse exported csv");
    assert!(parsed.issues.is_empty(), "{:?}", parsed.issues);
    assert_eq!(
        types(&parsed.rows),
        vec![
            RowType::Campaign,
            RowType::AdGroup,
            RowType::Keyword,
            RowType::Keyword,
            RowType::Keyword,
            RowType::ResponsiveSearchAd,
        ]
    );

    let match_types: Vec<&str> = parsed
        .rows
        .iter()
        .filter(|row| row.row_type() == Some(RowType::Keyword))
        .map(|row| row.get("Match type"))
        .collect();
    assert_eq!(match_types, vec!["Broad", "Phrase", "Exact"]);

    let ad = parsed.rows.last().expect("ad row");
    assert_eq!(ad.get("Ad group"), "plumber near me");
    assert_eq!(ad.get("Final URL"), "https://plumbing.example.com");
}

#[test]
fn test_every_strategy_produces_a_valid_export() {
    let keywords = read_keyword_fixture();
    let mut base = skag_settings();
    base.intent_groups.insert(
        "high_intent".to_owned(),
        vec!["emergency plumber".to_owned(), "plumber near me".to_owned()],
    );
    base.intent_groups.insert("research".to_owned(), vec!["drain cleaning cost".to_owned()]);
    base.funnel_groups.insert("tof".to_owned(), vec!["why is my drain slow".to_owned()]);
    base.funnel_groups.insert("bof".to_owned(), vec!["hire plumber today".to_owned()]);
    base.competitor_keywords = Some(vec!["roto rooter alternative".to_owned()]);

    for structure_type in StructureType::ALL {
        let settings = StructureSettings {
            structure_type,
            ..base.clone()
        };
        let structure = build(&keywords, &settings);
        assert!(!structure.campaigns.is_empty(), "{structure_type}");

        let rows = compile(&structure).expect("compile");
        let report = validate_rows(&rows);
        assert!(report.is_valid, "{structure_type}: {:?}", report.errors);

        let row_types = types(&rows);
        assert!(row_types.contains(&RowType::Keyword), "{structure_type}: no keyword rows");
        assert!(
            row_types.contains(&RowType::ResponsiveSearchAd)
                || row_types.contains(&RowType::CallOnlyAd),
            "{structure_type}: no ad rows"
        );
    }
}

#[test]
fn test_compile_is_deterministic_and_deduplicates() {
    let mut first = AdGroup::new("Repairs");
    first.keywords = vec!["plumber repair".into(), "Plumber Repair".into()];
    let mut second = AdGroup::new("More Repairs");
    second.keywords = vec!["PLUMBER REPAIR".into(), "[plumber repair]".into()];
    let structure = CampaignStructure {
        campaigns: vec![Campaign {
            name: "Plumbing".to_owned(),
            ad_groups: vec![first, second],
            ..Campaign::default()
        }],
    };

    let output = compile_detailed(&structure, &ExportConfig::default()).expect("compile");
    assert_eq!(output.stats.keywords, 2);
    assert_eq!(output.stats.duplicate_keywords, 2);
    assert_eq!(compile(&structure).expect("compile again"), output.rows);
}

#[test]
fn test_rows_follow_their_parents() {
    let settings =
        StructureSettings::from_file("testdata/plumbing.settings.json").expect("settings fixture");
    let structure = build(&read_keyword_fixture(), &settings);
    let rows = compile(&structure).expect("compile");

    let mut campaigns = HashSet::new();
    let mut ad_groups = HashSet::new();
    for row in &rows {
        let campaign = row.get("Campaign");
        let ad_group = row.get("Ad group");
        match row.row_type() {
            Some(RowType::Campaign) => {
                campaigns.insert(campaign);
            }
            Some(RowType::AdGroup) => {
                assert!(campaigns.contains(campaign), "{campaign}");
                ad_groups.insert((campaign, ad_group));
            }
            Some(_) => {
                assert!(campaigns.contains(campaign), "{campaign}");
                assert!(ad_groups.contains(&(campaign, ad_group)), "{ad_group}");
            }
            None => panic!("row without a type"),
        }
    }
    assert_eq!(ad_groups.len(), 3);
}

#[test]
fn test_every_row_carries_every_column() {
    let structure = build(&read_keyword_fixture(), &skag_settings());
    let rows = compile(&structure).expect("compile");
    assert!(rows.iter().all(|row| row.values().len() == COLUMN_COUNT));

    let export = render_export(&structure, &ExportConfig::default(), today()).expect("render");
    let parsed = parse_csv(&export.csv).expect("parse");
    assert!(parsed.issues.is_empty(), "{:?}", parsed.issues);
    assert_eq!(parsed.rows, rows);
    assert_eq!(EDITOR_COLUMNS.first(), Some(&"Type"));
}

#[test]
fn test_negative_exact_from_settings() {
    let settings = StructureSettings {
        negative_keywords: vec!["-[cheap]".into(), "diy".into()],
        ..skag_settings()
    };
    let structure = build(&[Keyword::from("plumber near me")], &settings);
    let rows = compile(&structure).expect("compile");

    let negatives: Vec<(&str, &str)> = rows
        .iter()
        .filter(|row| row.row_type() == Some(RowType::NegativeKeyword))
        .map(|row| (row.get("Keyword"), row.get("Match type")))
        .collect();
    assert_eq!(
        negatives,
        vec![("cheap", "Negative Exact"), ("diy", "Negative Broad")]
    );
}

#[test]
fn test_thin_ad_is_repaired_not_dropped() {
    let thin = Ad::Rsa(RsaAd {
        headlines: vec!["Drain Experts".to_owned()],
        descriptions: Vec::new(),
        ..RsaAd::default()
    });
    let settings = StructureSettings {
        ads: Some(vec![thin]),
        ..skag_settings()
    };
    let structure = build(&[Keyword::from("drain cleaning")], &settings);
    let export = render_export(&structure, &ExportConfig::default(), today()).expect("render");
    assert!(export.validation.is_valid, "{:?}", export.validation.errors);
    assert_eq!(export.stats.repaired_ads, 1);

    let rows = compile(&structure).expect("compile");
    let ad = rows
        .iter()
        .find(|row| row.row_type() == Some(RowType::ResponsiveSearchAd))
        .expect("ad row survives");
    assert_eq!(ad.get("Headline 1"), "Drain Experts");
    assert!(!ad.get("Headline 3").is_empty());
    assert!(!ad.get("Description 2").is_empty());
    assert_eq!(ad.get("Final URL"), "https://plumbing.example.com");
}

#[test]
fn test_run_export_from_spec_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let spec = ExportSpec::from_file("testdata/plumbing.export.json").expect("spec fixture");
    let output = dir.path().join("plumbing.csv");

    let report = run_export(&spec, &ExportConfig::default(), Some(&output), today())
        .expect("export runs");
    assert_eq!(report.output_path, output);
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    assert_eq!(report.stats.campaigns, 1);
    assert_eq!(report.stats.ad_groups, 3);
    assert_eq!(report.stats.negative_keywords, 3);

    let rows = parse_csv(&std::fs::read_to_string(&output).expect("read output"))
        .expect("parse output")
        .rows;
    let ad_groups: HashSet<&str> = rows
        .iter()
        .filter(|row| row.row_type() == Some(RowType::AdGroup))
        .map(|row| row.get("Ad group"))
        .collect();
    let with_negatives: HashSet<&str> = rows
        .iter()
        .filter(|row| row.row_type() == Some(RowType::NegativeKeyword))
        .map(|row| row.get("Ad group"))
        .collect();
    assert_eq!(ad_groups.len(), 3);
    assert_eq!(with_negatives, ad_groups);

    let bytes = std::fs::read(&output).expect("read output");
    assert!(bytes.starts_with(BOM.as_bytes()));
    let text = String::from_utf8(bytes).expect("utf-8 output");
    let body = text.strip_prefix(BOM).expect("bom");
    assert!(body.ends_with("\r\n"));
    assert_eq!(body.matches("\r\n").count(), report.rows + 1);
    assert_eq!(body.matches('\n').count(), report.rows + 1);
}
