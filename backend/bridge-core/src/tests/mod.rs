mod bridge;
mod codec;
mod registry;
mod schema;
mod viewer;
