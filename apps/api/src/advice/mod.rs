// Advice decoding: raw AI reply → sections, roadmap, checklist, graph, resource lists.
// Nothing in this module performs I/O; every stage degrades to a fallback instead of erroring.

pub mod checklist;
pub mod decoder;
pub mod graph;
pub mod handlers;
pub mod listing;
pub mod prompts;
pub mod roadmap;
pub mod sections;
