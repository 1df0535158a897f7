//! different utility modules used throughout the project
/// terminal and file logging set-up
pub mod logger;
/// tiny module to typeset the generated equations
pub mod plots;
/// variable -> equation dependency graph of a generated system, its layout and picture
pub mod dependency_graph;
/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3" into a generator task
pub mod task_parser;
