#[path = "parsers/c/test_basic.rs"]
mod test_basic;
