use bevy::prelude::*;

/// 面向用户的一行输出，由 main 中的 forward_log_event 打印
#[derive(Event, Debug, Clone)]
pub struct LogEvent(pub String);
