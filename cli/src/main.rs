use clap::Parser;
use minefield_core::Board;
use std::io;

mod command;
mod game;
mod render;

#[derive(Parser, Debug)]
#[command(version, about = "Play Minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Number of rows on the board
    #[arg(long, default_value_t = 9)]
    rows: usize,

    /// Number of columns on the board
    #[arg(long, default_value_t = 9)]
    cols: usize,

    /// Number of mines, asked for interactively when omitted
    #[arg(short, long)]
    mines: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();

    let mut board = match args.mines {
        Some(mines) => Board::new(args.rows, args.cols, mines)?,
        None => match game::ask_board(&mut input, &mut output, args.rows, args.cols)? {
            Some(board) => board,
            None => return Ok(()),
        },
    };
    board.place_random_mines()?;
    log::debug!(
        "Starting a {}x{} game with {} mines",
        board.rows(),
        board.cols(),
        board.mine_count()
    );

    let ending = game::play(&mut board, &mut input, &mut output)?;
    log::debug!("Game ended: {ending:?}");
    Ok(())
}
