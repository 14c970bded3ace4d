use crate::error::ControllerError;
use crate::game::Game;
use crate::location::Move;
use crate::piece::Side;
use crate::search::{SearchConfig, Searcher};
use log::info;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Mode {
    HumanVsHuman,
    HumanVsComputer { computer: Side },
}

/// Owns the game and drives turns: human moves go through the rules, and in
/// computer mode every accepted human move is answered by exactly one search.
pub struct Controller {
    game: Game,
    mode: Mode,
    searcher: Searcher,
}

impl Controller {
    pub fn new(mode: Mode, config: SearchConfig) -> Self {
        Self {
            game: Game::opening(),
            mode,
            searcher: Searcher::new(config),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn searcher(&self) -> &Searcher {
        &self.searcher
    }

    pub fn computer(&self) -> Option<Side> {
        match self.mode {
            Mode::HumanVsHuman => None,
            Mode::HumanVsComputer { computer } => Some(computer),
        }
    }

    pub fn is_computer_turn(&self) -> bool {
        !self.game.is_over() && self.computer() == Some(self.game.side_to_move())
    }

    /// Plays a human move and, in computer mode, the computer's reply to it.
    /// Returns the reply if one was played.
    pub fn play(&mut self, mv: Move) -> Result<Option<Move>, ControllerError> {
        if self.game.is_over() {
            return Err(ControllerError::GameOver);
        }
        if self.is_computer_turn() {
            return Err(ControllerError::ComputerToMove);
        }
        if !self.game.play(mv) {
            return Err(ControllerError::IllegalMove(mv));
        }

        info!("{} played {mv}", self.game.side_to_move().opponent());
        self.announce_outcome();

        if self.is_computer_turn() {
            return self.respond().map(Some);
        }
        Ok(None)
    }

    /// Searches and plays the computer's move. Only valid on the computer's
    /// turn; a game that is still live must always have a reply.
    pub fn respond(&mut self) -> Result<Move, ControllerError> {
        if self.game.is_over() {
            return Err(ControllerError::GameOver);
        }

        let side = self.game.side_to_move();
        if self.computer() != Some(side) {
            return Err(ControllerError::HumanToMove);
        }

        let Some(reply) = self.searcher.best_move(&self.game) else {
            return Err(ControllerError::NoReply(side));
        };

        if !self.game.play(reply) {
            return Err(ControllerError::IllegalMove(reply));
        }

        info!("computer playing {side} replied {reply}");
        self.announce_outcome();
        Ok(reply)
    }

    /// Takes back one ply against a human, or the computer's reply together
    /// with the human move before it so that the human is to move again.
    pub fn undo(&mut self) -> Result<usize, ControllerError> {
        let last_mover = self.game.side_to_move().opponent();
        let plies = match self.computer() {
            Some(computer) if computer == last_mover => 2,
            _ => 1,
        };

        if self.game.history().len() < plies {
            return Err(ControllerError::NothingToUndo);
        }

        for _ in 0..plies {
            self.game.undo();
        }

        info!("took back {plies} plies, {} to move", self.game.side_to_move());
        Ok(plies)
    }

    pub fn reset(&mut self) {
        info!("new game");
        self.game = Game::opening();
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Replaces the game, for instance with one restored from a snapshot.
    pub fn load(&mut self, game: Game) {
        info!("loaded game with {} plies, {} to move", game.history().len(), game.side_to_move());
        self.game = game;
    }

    fn announce_outcome(&self) {
        if let Some(outcome) = self.game.outcome() {
            info!("game over: {outcome}");
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(Mode::HumanVsHuman, SearchConfig::default())
    }
}
