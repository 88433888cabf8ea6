mod bson;
mod decode;
mod document;
mod encode;
mod hooks;
mod lexer;
mod macros;
mod registry;
