// Terminal front end for huddle: view state, key handling and widgets.

pub mod tui;
