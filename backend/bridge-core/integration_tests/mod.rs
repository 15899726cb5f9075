mod helpers;
mod scenarios;
mod server;
