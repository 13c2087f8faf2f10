mod commands;
mod dispatcher;
mod replies;

pub use dispatcher::handle_event;
pub use replies::ReplyMessage;
