//! Example: create a workspace with a single board
//!
//! Run with:
//!
//! ```sh
//! TRELLO_API_KEY=... TRELLO_TOKEN=... \
//!     cargo run -p boardapi --example create_workspace -- "Acme"
//! ```

use boardapi::backend::BoardApi;
use boardapi::backend::trello::TrelloBackend;
use boardapi::Credentials;

fn main() {
    let (Ok(key), Ok(token)) = (
        std::env::var("TRELLO_API_KEY"),
        std::env::var("TRELLO_TOKEN"),
    ) else {
        eprintln!("Set TRELLO_API_KEY and TRELLO_TOKEN first.");
        std::process::exit(1);
    };

    let name = std::env::args().nth(1).unwrap_or_else(|| "boardapi example".to_string());
    let api = TrelloBackend::new(Credentials::new(key, token));

    let workspace = match api.create_workspace(&name) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Workspace creation failed: {} ({})", e, e.category().advice());
            std::process::exit(1);
        }
    };
    println!("Workspace: {}", workspace);

    match api.create_board(&workspace, "Getting started") {
        Ok(board) => {
            println!("Board:     {}", board);
            for list in ["To Do", "Doing", "Done"] {
                if let Err(e) = api.create_list(&board, list) {
                    eprintln!("  list '{}' failed: {}", list, e);
                }
            }
        }
        Err(e) => eprintln!("Board creation failed: {}", e),
    }
}
