//! Integration tests for the PDF cleaner.

use docmark::error::{Error, Result};
use docmark::layout::Word;
use docmark::{Cleaner, PageWords, PdfBackend, PdfCleaner, PdfOptions};

/// In-memory page source.
#[derive(Default)]
struct FakeBackend {
    pages: Vec<FakePage>,
}

struct FakePage {
    width: f64,
    height: f64,
    words: Vec<Word>,
    text: String,
    broken: bool,
}

impl FakePage {
    fn new(words: Vec<Word>) -> Self {
        Self {
            width: 612.0,
            height: 1000.0,
            words,
            text: String::new(),
            broken: false,
        }
    }

    fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    fn broken(mut self) -> Self {
        self.broken = true;
        self
    }
}

impl FakeBackend {
    fn page(mut self, page: FakePage) -> Self {
        self.pages.push(page);
        self
    }

    fn get(&self, number: u32) -> Result<&FakePage> {
        self.pages
            .get(number as usize - 1)
            .ok_or_else(|| Error::Parse(format!("no page {number}")))
    }
}

impl PdfBackend for FakeBackend {
    fn page_numbers(&self) -> Vec<u32> {
        (1..=self.pages.len() as u32).collect()
    }

    fn page_words(&self, number: u32) -> Result<PageWords> {
        let page = self.get(number)?;
        if page.broken {
            return Err(Error::Parse("bad content stream".to_string()));
        }
        Ok(PageWords {
            number,
            width: page.width,
            height: page.height,
            words: page.words.clone(),
        })
    }

    fn page_text(&self, number: u32) -> Result<String> {
        Ok(self.get(number)?.text.clone())
    }
}

fn word(text: &str, top: f64, x0: f64, x1: f64) -> Word {
    Word::new(text, top, top + 10.0, x0, x1, 10.0, "Helvetica")
}

fn sized(text: &str, top: f64, x0: f64, x1: f64, size: f64, font: &str) -> Word {
    Word::new(text, top, top + size, x0, x1, size, font)
}

fn clean(backend: &FakeBackend) -> String {
    PdfCleaner::default().clean_with_backend(backend).unwrap()
}

#[test]
fn test_header_and_footer_bands_removed() {
    let backend = FakeBackend::default().page(FakePage::new(vec![
        word("Header", 40.0, 50.0, 110.0),
        word("Body", 200.0, 50.0, 110.0),
        word("content", 200.0, 120.0, 180.0),
        word("Footer", 930.0, 50.0, 110.0),
    ]));
    assert_eq!(clean(&backend), "Body content");
}

#[test]
fn test_bold_large_line_becomes_heading() {
    let backend = FakeBackend::default().page(FakePage::new(vec![
        sized("Annual", 120.0, 40.0, 100.0, 15.0, "Helvetica-Bold"),
        sized("Report", 120.0, 110.0, 170.0, 15.0, "Helvetica-Bold"),
        sized("Overview", 220.0, 40.0, 110.0, 10.0, "Helvetica"),
        sized("details", 220.0, 120.0, 170.0, 10.0, "Helvetica"),
    ]));
    assert_eq!(clean(&backend), "## Annual Report\nOverview details");
}

#[test]
fn test_two_columns_read_left_then_right() {
    let backend = FakeBackend::default().page(FakePage::new(vec![
        word("Left1.", 200.0, 50.0, 150.0),
        word("Right1.", 200.0, 400.0, 500.0),
        word("Left2.", 215.0, 50.0, 150.0),
        word("Right2.", 215.0, 400.0, 500.0),
        word("Left3.", 230.0, 50.0, 150.0),
        word("Right3.", 230.0, 400.0, 500.0),
    ]));
    assert_eq!(
        clean(&backend),
        "Left1.\nLeft2.\nLeft3.\n\nRight1.\nRight2.\nRight3."
    );
}

#[test]
fn test_noise_lines_dropped() {
    let backend = FakeBackend::default().page(FakePage::new(vec![
        word("1", 200.0, 50.0, 60.0),
        word("2", 200.0, 65.0, 75.0),
        word("3", 200.0, 80.0, 90.0),
        word("A", 215.0, 50.0, 60.0),
        word("正常文本", 230.0, 50.0, 90.0),
    ]));
    assert_eq!(clean(&backend), "正常文本");
}

#[test]
fn test_wrapped_lines_merge_until_terminator() {
    let backend = FakeBackend::default().page(FakePage::new(vec![
        word("The", 200.0, 50.0, 80.0),
        word("quick", 200.0, 85.0, 120.0),
        word("brown", 212.0, 50.0, 90.0),
        word("fox.", 212.0, 95.0, 120.0),
        word("- item", 224.0, 50.0, 100.0),
    ]));
    assert_eq!(clean(&backend), "The quick brown fox.\n- item");
}

#[test]
fn test_pages_joined_in_order() {
    let backend = FakeBackend::default()
        .page(FakePage::new(vec![word("First.", 200.0, 50.0, 110.0)]))
        .page(FakePage::new(vec![word("Second.", 200.0, 50.0, 110.0)]))
        .page(FakePage::new(vec![word("Third.", 200.0, 50.0, 110.0)]));
    assert_eq!(clean(&backend), "First.\n\nSecond.\n\nThird.");
}

#[test]
fn test_parallel_matches_sequential() {
    let mut backend = FakeBackend::default();
    for i in 0..24 {
        let top = 200.0 + (i % 5) as f64 * 30.0;
        backend = backend.page(FakePage::new(vec![
            word(&format!("Page{i}"), top, 50.0, 120.0),
            word("body.", top, 125.0, 160.0),
            word("Column", top, 400.0, 470.0),
            word("text.", top, 475.0, 510.0),
        ]));
    }

    let parallel = PdfCleaner::new(PdfOptions::new().with_parallel(true))
        .clean_with_backend(&backend)
        .unwrap();
    let sequential = PdfCleaner::new(PdfOptions::new().sequential())
        .clean_with_backend(&backend)
        .unwrap();
    assert_eq!(parallel, sequential);
    assert!(parallel.starts_with("Page0 body."));
    assert!(parallel.find("Page1 body.") < parallel.find("Page2 body."));
}

#[test]
fn test_empty_page_uses_text_fallback() {
    let backend = FakeBackend::default()
        .page(
            FakePage::new(vec![word("Only header", 20.0, 50.0, 120.0)]).with_text("  Scanned text  "),
        )
        .page(FakePage::new(vec![word("Body.", 200.0, 50.0, 110.0)]));
    assert_eq!(clean(&backend), "Scanned text\n\nBody.");
}

#[test]
fn test_blank_pages_are_skipped() {
    let backend = FakeBackend::default()
        .page(FakePage::new(vec![word("Body.", 200.0, 50.0, 110.0)]))
        .page(FakePage::new(Vec::new()))
        .page(FakePage::new(vec![word("End.", 200.0, 50.0, 110.0)]));
    assert_eq!(clean(&backend), "Body.\n\nEnd.");
}

#[test]
fn test_undecodable_page_is_parse_error() {
    let backend = FakeBackend::default()
        .page(FakePage::new(vec![word("Fine.", 200.0, 50.0, 110.0)]))
        .page(FakePage::new(Vec::new()).with_text("Recovered").broken());

    for options in [PdfOptions::new().with_parallel(true), PdfOptions::new().sequential()] {
        let err = PdfCleaner::new(options).clean_with_backend(&backend).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}

#[test]
fn test_output_is_nfkc_normalized() {
    let backend =
        FakeBackend::default().page(FakePage::new(vec![word("Ｆｕｌｌ", 200.0, 50.0, 110.0)]));
    assert_eq!(clean(&backend), "Full");
}

#[test]
fn test_custom_bands() {
    let backend = FakeBackend::default().page(FakePage::new(vec![
        word("Top", 40.0, 50.0, 110.0),
        word("Body", 200.0, 50.0, 110.0),
    ]));
    let cleaner = PdfCleaner::new(PdfOptions::new().with_bands(0.0, 1.0));
    assert_eq!(cleaner.clean_with_backend(&backend).unwrap(), "Top\n\nBody");
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = PdfCleaner::default()
        .clean(&dir.path().join("missing.pdf"))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_non_pdf_bytes_are_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake.pdf");
    std::fs::write(&path, "<html>not a pdf</html>").unwrap();
    let err = PdfCleaner::default().clean(&path).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

#[test]
fn test_generated_pdf_through_lopdf() {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), Object::Integer(48)]),
            Operation::new("Td", vec![Object::Integer(100), Object::Integer(600)]),
            Operation::new("Tj", vec![Object::string_literal("Hello World!")]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => Object::Integer(1),
        "Resources" => resources_id,
        "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(595), Object::Integer(842)],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.pdf");
    doc.save(&path).unwrap();

    let backend = docmark::LopdfBackend::load_file(&path).unwrap();
    assert_eq!(backend.page_numbers(), vec![1]);
    let page = backend.page_words(1).unwrap();
    assert_eq!(page.width, 595.0);
    assert_eq!(page.height, 842.0);
    let texts: Vec<&str> = page.words.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(texts, vec!["Hello", "World!"]);
    assert_eq!(page.words[0].font_name, "Courier");

    let text = PdfCleaner::default().clean(&path).unwrap();
    assert_eq!(text, "Hello World!");
}
