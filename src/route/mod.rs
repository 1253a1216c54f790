//! Registered routes and the handlers that document them.
//!
//! Routes are declared with native rules such as `/users/<int:id>`; the
//! placeholders give both the path argument names and their types.

mod load;
mod rule;
mod types;

pub use load::{load_route_table, parse_route_table, HandlerEntry, RouteEntry, RouteTable, RouteTableFile};
pub use rule::{parse_placeholders, to_path_template, Placeholder};
pub use types::{ArgumentType, Handler, HandlerLookup, Route, RouteHandlers, ViewKind};
