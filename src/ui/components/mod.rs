pub mod filter_tabs;
pub mod progress_bar;
pub mod search_bar;
pub mod word_detail;
pub mod word_list;
