use modprint::core::bypass::Bypassed;
use modprint::{FixedClock, MemoryOutput, PrintOptions, Printer, PrinterSettings, Setting};
use std::fmt::Display;

fn printer() -> Printer<MemoryOutput> {
    Printer::new(MemoryOutput::new())
        .with_settings(PrinterSettings::plain())
        .with_clock(FixedClock::parse("2024-03-05T21:07:09+00:00").unwrap())
}

#[test]
fn test_default_options_match_println() {
    let p = printer();
    let cases: [&[&dyn Display]; 3] = [
        &[&"hello"],
        &[&"a", &1, &-2.5, &true, &'c'],
        &[&"  padded  ", &""],
    ];

    for values in cases {
        let expected = values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ")
            + "\n";
        assert_eq!(p.render(values, &PrintOptions::new()).unwrap(), expected);
    }
}

#[test]
fn test_screen_receives_one_write_per_call() {
    let p = printer();
    p.print(&[&"one"], &PrintOptions::new()).unwrap();
    p.print(&[&"two", &"three"], &PrintOptions::new().sep("-").end(";")).unwrap();
    assert_eq!(p.output().take_screen(), "one\ntwo-three;");
    assert_eq!(p.output().screen(), "");
}

#[test]
fn test_timestamps_in_utc() {
    let p = Printer::new(MemoryOutput::new())
        .with_settings(PrinterSettings::plain())
        .with_clock(FixedClock::parse("2024-03-05T21:07:09-05:00").unwrap());

    let opts = PrintOptions::new()
        .print_ts(true)
        .use_utc(true)
        .ts_format("%H:%M {tzname} {tzoffset}");
    assert_eq!(
        p.render(&[&"late"], &opts).unwrap(),
        "02:07 UTC +0000 late\n"
    );

    let opts = opts.use_utc(false);
    assert_eq!(
        p.render(&[&"late"], &opts).unwrap(),
        "21:07 UTC-05:00 -0500 late\n"
    );
}

#[test]
fn test_invalid_timestamp_format_is_an_error() {
    let p = printer();
    let opts = PrintOptions::new().print_ts(true).ts_format("%Q");
    assert!(matches!(
        p.render(&[&"x"], &opts),
        Err(modprint::PrintError::InvalidTimestampFormat { .. })
    ));
}

#[test]
fn test_clever_splitting_keeps_long_words() {
    let p = Printer::new(MemoryOutput::new());
    let opts = PrintOptions::new().width(10);
    assert_eq!(
        p.render(&[&"tiny supercalifragilistic end"], &opts).unwrap(),
        "tiny\nsupercalifragilistic\nend\n"
    );
}

#[test]
fn test_bypassed_splitter_overrides_option() {
    let p = printer();
    let mut bypassed = Bypassed::default();
    bypassed.insert(Setting::Splitter, serde_json::json!(true));
    let opts = PrintOptions::new().split(false).width(8);
    assert_eq!(
        p.render_text("aaa bbb ccc", &opts, &bypassed).unwrap(),
        "aaa bbb\nccc\n"
    );
}

// 只確認巨集可展開，不實際輸出到 stdout
#[allow(dead_code)]
fn nprint_macro_forms() {
    modprint::nprint!();
    modprint::nprint!("nprint", 1, 2.0,);
    let () = modprint::nprint!("as an expression");
}
