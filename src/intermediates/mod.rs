//! The data structures handed from one pass to the next: tokens out of the
//! lexer, nodes and node streams out of the parser and optimizer

pub mod node;
pub mod stream;
pub mod token;
pub mod value;

pub use node::*;
pub use stream::NodeStream;
pub use token::{Character, Operator, Token, TokenKind};
pub use value::{NativeType, Value};
