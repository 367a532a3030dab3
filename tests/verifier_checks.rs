mod fixtures;

use fixtures::{TempDir, TestFixtures};
use pdf_unlink::utils::NoProgress;
use pdf_unlink::verifier::IssueCategory;
use pdf_unlink::{OutputVerifier, Pipeline, StripConfig};

#[test]
fn untouched_input_fails_verification() {
    let dir = TempDir::new();
    let input = dir.write("in.pdf", &TestFixtures::linked_pdf(2));
    let verifier = OutputVerifier::from_config(&StripConfig::default()).unwrap();

    let report = verifier.verify_file(&input).unwrap();
    assert!(!report.passed);

    let page_entries = report
        .issues
        .iter()
        .filter(|i| i.category == IssueCategory::PageEntry)
        .count();
    // Annots and AA on each page
    assert_eq!(page_entries, 4);
    assert!(report
        .issues
        .iter()
        .any(|i| i.category == IssueCategory::CatalogEntry));
    assert!(report
        .issues
        .iter()
        .any(|i| i.category == IssueCategory::Content && i.page == Some(2)));
}

#[test]
fn stripped_output_passes_verification() {
    let dir = TempDir::new();
    let input = dir.write("in.pdf", &TestFixtures::linked_pdf(2));
    let output = dir.path().join("out.pdf");
    let config = StripConfig::default();

    Pipeline::new(config.clone()).unwrap().execute(&input, &output, &NoProgress).unwrap();
    let report = OutputVerifier::from_config(&config).unwrap().verify_file(&output).unwrap();

    assert!(report.passed, "{:?}", report.issues);
}

#[test]
fn unreadable_content_is_reported() {
    let dir = TempDir::new();
    let input = dir.write("in.pdf", &TestFixtures::broken_contents_pdf());
    let output = dir.path().join("out.pdf");
    let config = StripConfig::default();

    Pipeline::new(config.clone()).unwrap().execute(&input, &output, &NoProgress).unwrap();
    let report = OutputVerifier::from_config(&config).unwrap().verify_file(&output).unwrap();

    assert!(!report.passed);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].category, IssueCategory::Content);
    assert_eq!(report.issues[0].page, Some(2));
    assert!(report.issues[0].description.contains("could not be read"));
}

#[test]
fn links_behind_indirect_contents_array_are_found() {
    let dir = TempDir::new();
    let input = dir.write("in.pdf", &TestFixtures::indirect_array_content_pdf());
    let verifier = OutputVerifier::from_config(&StripConfig::default()).unwrap();

    let report = verifier.verify_file(&input).unwrap();
    assert!(!report.passed);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].category, IssueCategory::Content);
    assert_eq!(report.issues[0].description, "content stream still matches a link pattern");

    let output = dir.path().join("out.pdf");
    Pipeline::new(StripConfig::default())
        .unwrap()
        .execute(&input, &output, &NoProgress)
        .unwrap();
    assert!(verifier.verify_file(&output).unwrap().passed);
}

#[test]
fn content_left_in_place_is_reported() {
    let dir = TempDir::new();
    let input = dir.write("in.pdf", &TestFixtures::linked_pdf(1));
    let output = dir.path().join("out.pdf");
    let strip = StripConfig {
        scrub_content: false,
        ..Default::default()
    };

    Pipeline::new(strip).unwrap().execute(&input, &output, &NoProgress).unwrap();
    let report = OutputVerifier::from_config(&StripConfig::default())
        .unwrap()
        .verify_file(&output)
        .unwrap();

    assert!(!report.passed);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].category, IssueCategory::Content);
    assert_eq!(report.issues[0].page, Some(1));
}
