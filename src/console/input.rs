//! Reading console lines without blocking the schedule.

use std::io::BufRead;

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use futures_lite::future;

/// One line typed on the console.
#[derive(Message, Debug, Clone)]
pub struct ConsoleLine(pub String);

/// Background read of the next stdin line. `None` means end of input.
#[derive(Resource, Default)]
pub struct StdinReader {
    pending: Option<Task<Option<String>>>,
}

fn read_line() -> Option<String> {
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        Err(e) => {
            error!("Failed to read console input: {}", e);
            None
        }
    }
}

/// System to keep one stdin read in flight and forward finished lines
pub fn poll_stdin(
    mut reader: ResMut<StdinReader>,
    mut lines: MessageWriter<ConsoleLine>,
    mut exit: MessageWriter<AppExit>,
) {
    let task = reader.pending.get_or_insert_with(|| {
        let task_pool = AsyncComputeTaskPool::get();
        task_pool.spawn(async move { read_line() })
    });

    if let Some(result) = future::block_on(future::poll_once(task)) {
        reader.pending = None;
        match result {
            Some(line) => {
                lines.write(ConsoleLine(line));
            }
            None => {
                info!("End of console input, exiting");
                exit.write(AppExit::Success);
            }
        }
    }
}
