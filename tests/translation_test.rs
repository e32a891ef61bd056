use modprint::{
    FormatArgs, LanguageCatalog, LogOptions, Logger, MemoryOutput, PrinterSettings, Setting,
    Translator,
};
use serde_json::json;

fn translator() -> Translator {
    let mut catalog = LanguageCatalog::default();
    catalog
        .insert("English", "SAVED", "Saved {0} files to {dir}")
        .insert("English", "DONE", "done")
        .insert("French", "SAVED", "{0} fichiers enregistrés dans {dir}")
        .insert("French", "DONE", "terminé");

    Translator::new(catalog)
        .unwrap()
        .with_languages([("French", "fr")])
}

fn logger(current: &str) -> Logger<MemoryOutput> {
    Logger::new(MemoryOutput::new())
        .with_settings(PrinterSettings {
            split: false,
            ts_format: String::new(),
            ..PrinterSettings::default()
        })
        .with_translator(translator().with_current(current))
}

fn saved_args() -> FormatArgs {
    FormatArgs::new().arg(3).named("dir", "/tmp")
}

#[test]
fn test_main_language_is_displayed_and_written() {
    let logger = logger("English");
    logger
        .log(&[&"SAVED"], &LogOptions::new().format(saved_args()))
        .unwrap();

    assert_eq!(logger.output().screen(), "Saved 3 files to /tmp\n");
    assert_eq!(
        logger.output().file("logger.log").unwrap(),
        "Saved 3 files to /tmp\n"
    );
    assert_eq!(logger.output().file_names(), vec!["logger.log".to_string()]);
}

#[test]
fn test_other_language_gets_its_own_file() {
    let logger = logger("French");
    logger
        .log(&[&"SAVED"], &LogOptions::new().format(saved_args()))
        .unwrap();

    // 只顯示翻譯後的版本
    assert_eq!(logger.output().screen(), "3 fichiers enregistrés dans /tmp\n");
    assert_eq!(
        logger.output().file("fr_logger.log").unwrap(),
        "3 fichiers enregistrés dans /tmp\n"
    );
    assert_eq!(
        logger.output().file("logger.log").unwrap(),
        "Saved 3 files to /tmp\n"
    );
}

#[test]
fn test_language_option_overrides_current() {
    let logger = logger("English");
    logger
        .log(&[&"DONE"], &LogOptions::new().language("French").write(false))
        .unwrap();
    assert_eq!(logger.output().screen(), "terminé\n");
}

#[test]
fn test_unknown_language_is_an_error() {
    let logger = logger("English");
    let err = logger
        .log(&[&"DONE"], &LogOptions::new().language("Klingon"))
        .unwrap_err();
    assert!(matches!(err, modprint::PrintError::UnknownLanguage { .. }));
}

#[test]
fn test_check_off_leaves_keys_alone() {
    let logger = logger("French");
    logger
        .log(&[&"DONE"], &LogOptions::new().check(false).write(false))
        .unwrap();
    assert_eq!(logger.output().screen(), "DONE\n");
}

#[test]
fn test_translate_bypass_keeps_main_language() {
    let mut logger = logger("French");
    logger.bypassers_mut().bind(
        Setting::Translate,
        ["normal"],
        vec![],
        Some(modprint::Lookup::Value(json!(true))),
    );

    logger.log(&[&"DONE"], &LogOptions::new()).unwrap();
    assert_eq!(logger.output().screen(), "done\n");
    assert!(logger.output().file("fr_logger.log").is_none());
}

#[test]
fn test_values_that_are_not_keys_are_untouched() {
    let logger = logger("French");
    logger
        .log(&[&"Result:", &"DONE"], &LogOptions::new().write(false))
        .unwrap();
    assert_eq!(logger.output().screen(), "Result: terminé\n");
}
