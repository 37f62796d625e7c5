fn main() {
    // Only the ESP-IDF build needs the embuild sysenv bridge; host test
    // builds (no `espidf` feature) skip it.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
