//! Test harness for running composition cases with stochastic variations

use std::collections::BTreeMap;

use crate::common::{ExpectedEvent, Gen, TestCase};
use splice_core::{Composer, Event, MemoryResolver, SpliceError};

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub documents: BTreeMap<String, String>,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
    pub seed: u64,
    pub errors: Vec<String>,
}

/// Compose the case's root over its documents
pub fn compose(root: &str, documents: &BTreeMap<String, String>) -> Result<Vec<Event>, SpliceError> {
    let mut resolver = MemoryResolver::new();
    for (location, content) in documents {
        resolver.insert(location.clone(), content);
    }
    let root = resolver
        .resource(root)
        .unwrap_or_else(|| panic!("root {} not among fixture documents", root));
    Composer::new(resolver).compose_to_vec(&root)
}

/// Format event for comparison
pub fn format_event(event: &Event) -> String {
    match event {
        Event::DocumentStart => "DocumentStart".to_string(),
        Event::DocumentEnd => "DocumentEnd".to_string(),
        Event::ElementStart { name, attributes } => {
            let mut out = format!("Start {:?}", name);
            for (key, value) in attributes.iter() {
                out.push_str(&format!(" {}={:?}", key, value));
            }
            out
        }
        Event::ElementEnd { name } => format!("End {:?}", name),
        Event::Text { content } => format!("Text {:?}", content),
        Event::Comment { content } => format!("Comment {:?}", content),
    }
}

/// Format expected event for comparison
fn format_expected(event: &ExpectedEvent) -> String {
    match event {
        ExpectedEvent::Bare(name) => name.clone(),
        ExpectedEvent::WithContent(name, content) if name == "Start" => match content.split_once(' ') {
            Some((element, attrs)) => {
                let mut out = format!("Start {:?}", element);
                for pair in attrs.split_whitespace() {
                    let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                    out.push_str(&format!(" {}={:?}", key, value));
                }
                out
            }
            None => format!("Start {:?}", content),
        },
        ExpectedEvent::WithContent(name, content) => format!("{} {:?}", name, content),
    }
}

/// Name of a SpliceError variant
fn error_kind(err: &SpliceError) -> &'static str {
    match err {
        SpliceError::ReferenceResolution { .. } => "ReferenceResolution",
        SpliceError::ResourceNotFound { .. } => "ResourceNotFound",
        SpliceError::Io { .. } => "Io",
        SpliceError::Malformed { .. } => "Malformed",
        SpliceError::IncludeDepthExceeded { .. } => "IncludeDepthExceeded",
        SpliceError::IncludeCycle { .. } => "IncludeCycle",
        SpliceError::Handler(_) => "Handler",
    }
}

fn check_error(case: &TestCase, outcome: &Result<Vec<Event>, SpliceError>, errors: &mut Vec<String>) {
    let expected = match &case.error {
        Some(expected) => expected,
        None => {
            if let Err(err) = outcome {
                errors.push(format!("Unexpected error: {}", err));
            }
            return;
        }
    };
    match outcome {
        Ok(_) => errors.push(format!("Expected {} error, composition succeeded", expected.kind)),
        Err(err) => {
            if error_kind(err) != expected.kind {
                errors.push(format!("Expected {} error, got {}: {}", expected.kind, error_kind(err), err));
            }
            if err.reference() != Some(expected.reference.as_str()) {
                errors.push(format!(
                    "Expected error naming '{}', got {:?}",
                    expected.reference,
                    err.reference()
                ));
            }
        }
    }
}

/// Run a single test case (canonical, no variations)
pub fn run_test(case: &TestCase) -> TestResult {
    let outcome = compose(&case.root, &case.documents);
    let actual: Vec<String> = match &outcome {
        Ok(events) => events.iter().map(format_event).collect(),
        Err(_) => Vec::new(),
    };
    let expected: Vec<String> = case.events.iter().map(format_expected).collect();

    let mut errors = Vec::new();
    check_error(case, &outcome, &mut errors);

    if outcome.is_ok() {
        if actual.len() != expected.len() {
            errors.push(format!(
                "Event count mismatch: expected {}, got {}",
                expected.len(),
                actual.len()
            ));
        }
        for (i, (act, exp)) in actual.iter().zip(expected.iter()).enumerate() {
            if act != exp {
                errors.push(format!("Event {}: expected '{}', got '{}'", i, exp, act));
            }
        }
    }

    TestResult {
        passed: errors.is_empty(),
        documents: case.documents.clone(),
        expected,
        actual,
        seed: 0,
        errors,
    }
}

/// Run test with stochastic variations
///
/// Applies independent variations to every document:
/// - Random whitespace before the closing root tag
/// - 40% chance of an extra fragment as first child of the root
/// - 40% chance of an extra fragment as last child of the root
///
/// Injected fragments never contain include markers, so the expected events
/// must still appear in order.
pub fn run_with_variations(case: &TestCase, gen: &mut Gen) -> TestResult {
    let documents: BTreeMap<String, String> = case
        .documents
        .iter()
        .map(|(location, content)| (location.clone(), vary(content, gen)))
        .collect();

    let outcome = compose(&case.root, &documents);
    let actual: Vec<String> = match &outcome {
        Ok(events) => events.iter().map(format_event).collect(),
        Err(_) => Vec::new(),
    };
    let expected: Vec<String> = case.events.iter().map(format_expected).collect();

    let mut errors = Vec::new();
    check_error(case, &outcome, &mut errors);

    // Subsequence match: injected fragments add events anywhere in the body
    let mut exp_idx = 0;
    for act in &actual {
        if exp_idx < expected.len() && act == &expected[exp_idx] {
            exp_idx += 1;
        }
    }
    if outcome.is_ok() && exp_idx < expected.len() {
        errors.push(format!(
            "Missing expected events starting at index {}: {:?}",
            exp_idx,
            &expected[exp_idx..]
        ));
    }

    TestResult {
        passed: errors.is_empty(),
        documents,
        expected,
        actual,
        seed: gen.seed,
        errors,
    }
}

/// Inject fragments and whitespace into a document's root element.
///
/// Documents whose root is self-closing are left alone.
fn vary(content: &str, gen: &mut Gen) -> String {
    let close = match content.rfind("</") {
        Some(idx) => idx,
        None => return content.to_string(),
    };
    let open_end = match root_open_end(content) {
        Some(idx) if idx < close => idx,
        _ => return content.to_string(),
    };

    let mut out = String::with_capacity(content.len() + 64);
    out.push_str(&content[..open_end]);
    if gen.chance(0.4) {
        out.push_str(&gen.xml_fragment());
    }
    out.push_str(&content[open_end..close]);
    if gen.chance(0.4) {
        out.push_str(&gen.xml_fragment());
    }
    out.push_str(&gen.whitespace());
    out.push_str(&content[close..]);
    out
}

/// Byte offset just past the `>` of the root element's start tag.
fn root_open_end(content: &str) -> Option<usize> {
    let mut pos = 0;
    loop {
        let start = pos + content[pos..].find('<')?;
        let rest = &content[start..];
        if rest.starts_with("<?") {
            pos = start + rest.find("?>")? + 2;
        } else if rest.starts_with("<!--") {
            pos = start + rest.find("-->")? + 3;
        } else if rest.starts_with("<!") {
            pos = start + rest.find('>')? + 1;
        } else {
            let end = start + rest.find('>')?;
            if content[..end].ends_with('/') {
                return None;
            }
            return Some(end + 1);
        }
    }
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!("Seed: {} (set SPLICE_TEST_SEED={} to reproduce)", self.seed, self.seed);
        eprintln!("\nDocuments:");
        for (location, content) in &self.documents {
            eprintln!("  {}:\n{}", location, content);
        }
        eprintln!("\nExpected events:");
        for (i, e) in self.expected.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nActual events:");
        for (i, e) in self.actual.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nErrors:");
        for e in &self.errors {
            eprintln!("  - {}", e);
        }
    }
}
