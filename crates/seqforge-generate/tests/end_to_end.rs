use seqforge_core::Properties;
use seqforge_generate::{GenerationError, InputAssembly, Orchestrator};

fn counter(start: &str, length: &str, step: &str, input: &str) -> Properties {
    Properties::new()
        .with("start", start)
        .with("length", length)
        .with("step", step)
        .with("input", input)
}

fn alphabet(list: &str, start: &str, length: &str, input: &str) -> Properties {
    Properties::new()
        .with("list", list)
        .with("start", start)
        .with("length", length)
        .with("input", input)
}

fn formula(formula: &str, input: &str) -> Properties {
    Properties::new()
        .with("formula", formula)
        .with("input", input)
}

fn accepted(orchestrator: Orchestrator, count: usize) -> Vec<String> {
    orchestrator
        .generate()
        .filter_map(|record| record.expect("generation should not fail"))
        .take(count)
        .collect()
}

#[test]
fn checksum_filter_yields_valid_numbers() {
    let mut assembly = InputAssembly::new();
    assembly
        .add("SEQUENTIALNUMBERGENERATOR", &counter("100000000", "9", "1", "0"))
        .expect("bind counter");
    assembly
        .add(
            "EVALUATION",
            &formula("(9*A+8*B+7*C+6*D+5*E+4*F+3*G+2*H-I)%11==0", "0"),
        )
        .expect("bind filter");
    let orchestrator = assembly.build("{1}").expect("build");

    assert_eq!(
        accepted(orchestrator, 5),
        vec!["100000009", "100000010", "100000022", "100000034", "100000046"]
    );
}

#[test]
fn rejected_ticks_are_absent_even_when_filter_is_not_templated() {
    let mut assembly = InputAssembly::new();
    assembly
        .add("SEQUENTIALNUMBERGENERATOR", &counter("100000000", "9", "1", "0"))
        .expect("bind counter");
    assembly
        .add(
            "EVALUATION",
            &formula("(9*A+8*B+7*C+6*D+5*E+4*F+3*G+2*H-I)%11==0", "0"),
        )
        .expect("bind filter");
    let orchestrator = assembly.build("{0}").expect("build");

    let records: Vec<Option<String>> = orchestrator
        .generate()
        .take(10)
        .map(|record| record.expect("generation should not fail"))
        .collect();

    // 100000001 through 100000008 fail the checksum
    assert!(records[..8].iter().all(Option::is_none));
    assert_eq!(records[8].as_deref(), Some("100000009"));
    assert_eq!(records[9].as_deref(), Some("100000010"));
}

#[test]
fn driving_exhaustion_is_fatal_and_terminal() {
    let mut assembly = InputAssembly::new();
    assembly
        .add(
            "SEQUENTIALNUMBERGENERATOR",
            &counter("1000000000", "10", "1000000000", "0"),
        )
        .expect("bind counter");
    assembly
        .add("EVALUATION", &formula("A==9 && A==0", "0"))
        .expect("bind filter");
    let mut records = assembly.build("{0}").expect("build").generate();

    let mut rejected = 0;
    let error = loop {
        match records.next().expect("sequence continues until exhaustion") {
            Ok(None) => rejected += 1,
            Ok(Some(record)) => panic!("unexpected accepted record {record}"),
            Err(err) => break err,
        }
    };

    // seeds at 2000000000, advances through 9000000000
    assert_eq!(rejected, 8);
    match error {
        GenerationError::Exhausted { index, last } => {
            assert_eq!(index, 0);
            assert_eq!(last, "9000000000");
        }
        other => panic!("expected exhaustion, got {other}"),
    }
    assert!(records.next().is_none());
}

#[test]
fn multi_slot_template_advances_every_driver() {
    let mut assembly = InputAssembly::new();
    assembly
        .add("SEQUENTIALASCIIGENERATOR", &alphabet("A,B,C,D,E,F", "A", "1", "0"))
        .expect("bind first alphabet");
    assembly
        .add("SEQUENTIALNUMBERGENERATOR", &counter("10", "2", "1", "1"))
        .expect("bind counter");
    assembly
        .add("SEQUENTIALASCIIGENERATOR", &alphabet("A,B,C,D,E,F", "AAA", "3", "2"))
        .expect("bind second alphabet");
    let orchestrator = assembly.build("{0}-{1}-{2}").expect("build");

    assert_eq!(
        accepted(orchestrator, 5),
        vec!["B-11-AAB", "C-12-AAC", "D-13-AAD", "E-14-AAE", "F-15-AAF"]
    );
}

#[test]
fn calculated_check_digit_follows_its_input() {
    let mut assembly = InputAssembly::new();
    assembly
        .add("SEQUENTIALNUMBERGENERATOR", &counter("1000", "4", "1", "0"))
        .expect("bind counter");
    assembly
        .add("CALCULATION", &formula("(A+B+C+D)%10", "0"))
        .expect("bind check digit");
    let orchestrator = assembly.build("{0}-{1}").expect("build");

    assert_eq!(
        accepted(orchestrator, 3),
        vec!["1001-2", "1002-3", "1003-4"]
    );
}

#[test]
fn derived_slots_update_in_dependency_order() {
    let mut assembly = InputAssembly::new();
    assembly
        .add("SEQUENTIALNUMBERGENERATOR", &counter("10", "2", "1", "0"))
        .expect("bind counter");
    // slot 1 filters the digit sum computed by slot 2
    assembly
        .add("EVALUATION", &formula("A==9", "2"))
        .expect("bind filter");
    assembly
        .add("CALCULATION", &formula("A+B", "0"))
        .expect("bind digit sum");
    let orchestrator = assembly.build("{0}:{1}").expect("build");

    assert_eq!(
        accepted(orchestrator, 4),
        vec!["18:9", "27:9", "36:9", "45:9"]
    );
}

#[test]
fn sub_formats_are_applied_before_templating() {
    let mut assembly = InputAssembly::new();
    assembly
        .add(
            "SEQUENTIALNUMBERGENERATOR",
            &counter("100000000", "9", "1", "0").with("format", "{0}{0}{0}.{0}{0}{0}.{0}{0}{0}"),
        )
        .expect("bind counter");
    let orchestrator = assembly.build("CPF {0}").expect("build");

    assert_eq!(
        accepted(orchestrator, 2),
        vec!["CPF 100.000.001", "CPF 100.000.002"]
    );
}

#[test]
fn seeded_table_is_visible_before_the_first_tick() {
    let mut assembly = InputAssembly::new();
    assembly
        .add("SEQUENTIALNUMBERGENERATOR", &counter("5", "2", "5", "0"))
        .expect("bind counter");
    assembly
        .add("CALCULATION", &formula("A*2", "0"))
        .expect("bind double");
    let orchestrator = assembly.build("{0}").expect("build");

    assert_eq!(orchestrator.ticks(), 0);
    assert_eq!(
        orchestrator.values(),
        &[Some("10".to_string()), Some("2".to_string())]
    );
}

#[test]
fn filter_dividing_by_a_zero_digit_only_rejects_that_candidate() {
    let mut assembly = InputAssembly::new();
    assembly
        .add("SEQUENTIALNUMBERGENERATOR", &counter("10", "2", "1", "0"))
        .expect("bind counter");
    assembly
        .add("EVALUATION", &formula("A/B", "0"))
        .expect("bind filter");
    let orchestrator = assembly.build("{1}").expect("build");

    // 20 and 30 divide by zero and are skipped
    assert_eq!(accepted(orchestrator, 3), vec!["11", "22", "33"]);
}
