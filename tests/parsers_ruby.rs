#[path = "parsers/ruby/test_basic.rs"]
mod test_basic;
