use tui_arcade::core::match3::{Grid, Match3Config};
use tui_arcade::core::{LightsOut, Match3Game, MemoryGame, SudokuGame, TreasureGame};
use tui_arcade::core::sudoku::Difficulty;
use tui_arcade::term::{
    encode_diff_into, encode_full_into, FrameBuffer, LightsOutView, Match3View, MemoryView, SudokuView,
    TreasureView, Viewport,
};
use tui_arcade::types::{Action, Direction, Pos};

fn fixture() -> Match3Game {
    let grid = Grid::from_rows(&["RGBY", "GBYR", "BYRG", "YRGB"]);
    let config = Match3Config {
        width: 4,
        height: 4,
        colors: 4,
        ..Match3Config::default()
    };
    Match3Game::from_grid(grid, config, 1)
}

#[test]
fn match3_board_border_hugs_the_cells() {
    // 4 cells of 3x1 plus the border: 14x6, exactly the viewport.
    let fb = Match3View::default().render(&fixture(), Viewport::new(14, 6));
    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(13, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 5).unwrap().ch, '└');
    assert_eq!(fb.get(13, 5).unwrap().ch, '┘');
    // Too narrow for the side panel.
    assert!(!fb.contains_text("SCORE"));
}

#[test]
fn cursor_move_redraws_only_a_few_cells() {
    let mut game = fixture();
    let view = Match3View::default();
    let vp = Viewport::new(60, 20);
    let before = view.render(&game, vp);
    game.apply_action(Action::Move(Direction::Right));
    let after = view.render(&game, vp);

    let mut full = Vec::new();
    encode_full_into(&after, &mut full).unwrap();
    let mut diff = Vec::new();
    encode_diff_into(&before, &after, &mut diff).unwrap();
    assert!(!diff.is_empty());
    assert!(diff.len() * 4 < full.len());
}

#[test]
fn tiny_viewports_render_without_panicking() {
    let sudoku = SudokuGame::new(Difficulty::Easy, 1);
    let lights = LightsOut::new(5, 1);
    let memory = MemoryGame::new(8, 1);
    let treasure = TreasureGame::new(1);
    for (w, h) in [(1, 1), (8, 3), (20, 6)] {
        let vp = Viewport::new(w, h);
        let _ = Match3View::default().render(&fixture(), vp);
        let _ = SudokuView.render(&sudoku, vp);
        let _ = LightsOutView.render(&lights, vp);
        let _ = MemoryView.render(&memory, vp);
        let fb = TreasureView.render(&treasure, vp);
        assert_eq!((fb.width(), fb.height()), (w, h));
    }
}

#[test]
fn every_sudoku_cell_is_clickable() {
    let vp = Viewport::new(80, 24);
    let map = SudokuView.layout(vp);
    let mut fb = FrameBuffer::new(80, 24);
    let game = SudokuGame::new(Difficulty::Easy, 9);
    SudokuView.render_into(&game, vp, &mut fb);
    for y in 0..9 {
        for x in 0..9 {
            let pos = Pos::new(x, y);
            let (sx, sy) = map.to_screen(pos).unwrap();
            for dx in 0..3 {
                assert_eq!(map.to_cell(sx + dx, sy), Some(pos));
            }
        }
    }
    assert_eq!(map.to_cell(map.x - 1, map.y), None);
}
