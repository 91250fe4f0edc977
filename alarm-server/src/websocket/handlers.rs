use alarm_core::GameError;
use alarm_types::{ClientMessage, ConnectionId, PlayerId, ServerMessage};
use tracing::{debug, info, warn};

use crate::hub::{GameHub, HubError};

impl GameHub {
    pub fn handle_client_message(&mut self, connection_id: ConnectionId, message: ClientMessage) {
        let result = match message {
            ClientMessage::CreateGame => self.handle_create_game(connection_id),
            ClientMessage::SubscribeToGame { game_id, player_id } => {
                self.handle_subscribe(connection_id, &game_id, player_id)
            }
            ClientMessage::UnsubscribeFromGame { game_id } => {
                self.handle_unsubscribe(connection_id, &game_id)
            }
            ClientMessage::Ready { game_id } => self.handle_ready(&game_id),
            ClientMessage::ClickPhrase {
                game_id,
                player_id,
                phrase,
            } => self.handle_click_phrase(&game_id, &player_id, &phrase),
            ClientMessage::Heartbeat => Ok(()),
        };

        if let Err(e) = result {
            warn!("Rejected message from {}: {}", connection_id, e);
            self.reply(
                connection_id,
                ServerMessage::Error {
                    message: e.to_string(),
                },
            );
        }
    }

    fn handle_create_game(&mut self, connection_id: ConnectionId) -> Result<(), HubError> {
        let game_id = self.games.create_game();
        self.reply(connection_id, ServerMessage::GameCreated { game_id });
        Ok(())
    }

    fn handle_subscribe(
        &mut self,
        connection_id: ConnectionId,
        game_id: &str,
        player_id: Option<PlayerId>,
    ) -> Result<(), HubError> {
        let connection = self
            .connections
            .get_connection(connection_id)
            .cloned()
            .ok_or(HubError::UnknownConnection { connection_id })?;

        // A socket that already has a player keeps it unless told otherwise
        let current = self.players.player_for_connection(connection_id).cloned();
        let requested = player_id.or_else(|| current.clone());
        let known = requested
            .as_deref()
            .is_some_and(|player_id| self.players.contains(player_id));

        let game = self.games.get_or_create(game_id);
        if !known && game.is_started() {
            info!("Refusing new player in running game {}", game.id());
            connection.send(ServerMessage::GameInProgressError);
            return Ok(());
        }
        let game_id = game.id().clone();

        if let Some(previous) = current.filter(|current| Some(current) != requested.as_ref()) {
            self.players.detach(connection_id);
            self.leave_if_disconnected(&previous);
        }
        let attachment = self.players.attach(connection, requested.as_deref());
        let player_id = attachment.player_id().clone();

        let Some(game) = self.games.get_mut(&game_id) else {
            return Err(GameError::UnknownGame { game_id }.into());
        };
        if game.add_player(&player_id) {
            info!("Player {} joined game {}", player_id, game.id());
        } else {
            debug!("Player {} already in game {}", player_id, game.id());
        }
        game.emit_player_count(&self.players);

        if game.is_started() {
            if let Some(player) = self.players.player(&player_id) {
                player.emit_start_game();
            }
        }
        Ok(())
    }

    fn handle_unsubscribe(
        &mut self,
        connection_id: ConnectionId,
        game_id: &str,
    ) -> Result<(), HubError> {
        let game = self
            .games
            .get_mut(game_id)
            .ok_or_else(|| GameError::UnknownGame {
                game_id: game_id.to_string(),
            })?;
        let Some(player_id) = self.players.player_for_connection(connection_id) else {
            debug!("Connection {} unsubscribed without a player", connection_id);
            return Ok(());
        };

        if game.remove_player(player_id) {
            info!("Player {} left game {}", player_id, game.id());
            game.emit_player_count(&self.players);
        }
        Ok(())
    }

    fn handle_ready(&mut self, game_id: &str) -> Result<(), HubError> {
        let game = self
            .games
            .get_mut(game_id)
            .ok_or_else(|| GameError::UnknownGame {
                game_id: game_id.to_string(),
            })?;
        game.generate_round(&mut self.players)?;

        let game_id = game.id().clone();
        self.sync_timer(&game_id);
        Ok(())
    }

    fn handle_click_phrase(
        &mut self,
        game_id: &str,
        player_id: &str,
        phrase: &str,
    ) -> Result<(), HubError> {
        let game = self
            .games
            .get_mut(game_id)
            .ok_or_else(|| GameError::UnknownGame {
                game_id: game_id.to_string(),
            })?;
        game.handle_click_phrase(&mut self.players, phrase, player_id)?;

        let game_id = game.id().clone();
        self.sync_timer(&game_id);
        Ok(())
    }
}
