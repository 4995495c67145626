//! different utility modules used throughout the project
/// tiny module to set up terminal and file logging
pub mod logger;
/// numbers typed by a user, with `.` or `,` as decimal separator
pub mod number_input;
/// pretty printing of task results as tables
pub mod report;
/// parse document with structure like "title1 \n key1: value1 \n title2 \n key2: value2" into sections
pub mod task_parser;
///
mod task_parser_tests;
/// turns parsed sections into tasks and runs them
pub mod task_runner;
