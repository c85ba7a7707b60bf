#[cfg(test)]
mod tests {
    use crate::{BattleEvent, Gender, HpStatus, Player, PokemonDetails, SlotToken, parse_line, to_id};
    use pretty_assertions::assert_eq;

    fn event(line: &str) -> BattleEvent {
        BattleEvent::parse(&parse_line(line).unwrap()).unwrap()
    }

    #[test]
    fn test_parse_slot_token() {
        let token = SlotToken::parse("p2a: Rotom-Wash").unwrap();
        assert_eq!(token.player, Player::P2);
        assert_eq!(token.position, Some('a'));
        assert_eq!(token.slot(), Some(0));
        assert_eq!(token.name, "Rotom-Wash");

        let inactive = SlotToken::parse("p1: Sparky").unwrap();
        assert_eq!(inactive.position, None);
        assert_eq!(inactive.slot(), None);

        assert!(SlotToken::parse("Garchomp").is_none());
        assert!(SlotToken::parse("p9a: Garchomp").is_none());
    }

    #[test]
    fn test_parse_details() {
        let details = PokemonDetails::parse("Pikachu, L50, F, shiny, tera:Electric");
        assert_eq!(details.species, "Pikachu");
        assert_eq!(details.level, Some(50));
        assert_eq!(details.gender, Gender::Female);
        assert!(details.shiny);
        assert_eq!(details.tera_type.as_deref(), Some("Electric"));

        let bare = PokemonDetails::parse("Rotom");
        assert_eq!(bare.level, None);
        assert_eq!(bare.gender, Gender::Unknown);
    }

    #[test]
    fn test_parse_hp_status() {
        assert_eq!(
            HpStatus::parse("50/100 slp"),
            Some(HpStatus {
                current: 50,
                max: Some(100),
                status: Some("slp".to_string()),
            })
        );

        let fainted = HpStatus::parse("0 fnt").unwrap();
        assert_eq!(fainted.current, 0);
        assert_eq!(fainted.max, None);
        assert!(fainted.is_fainted());

        assert!(HpStatus::parse("").is_none());
        assert!(HpStatus::parse("abc/100").is_none());
    }

    #[test]
    fn test_parse_player() {
        assert_eq!(
            event("|player|p1|Alice|60|1532"),
            BattleEvent::Player {
                player: Player::P1,
                username: "Alice".to_string(),
                avatar: "60".to_string(),
                rating: Some(1532),
            }
        );

        let no_rating = event("|player|p2|Bob|");
        assert!(matches!(no_rating, BattleEvent::Player { rating: None, .. }));
    }

    #[test]
    fn test_parse_move() {
        let parsed = event("|move|p1a: Garchomp|Earthquake|p2a: Rotom|[spread] p2a,p2b");

        match parsed {
            BattleEvent::Move {
                pokemon,
                move_name,
                target,
                miss,
                ..
            } => {
                assert_eq!(pokemon.name, "Garchomp");
                assert_eq!(move_name, "Earthquake");
                assert_eq!(target.map(|t| t.name), Some("Rotom".to_string()));
                assert!(!miss);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_parse_move_missing_name() {
        let command = parse_line("|move|p1a: Garchomp").unwrap();
        assert!(BattleEvent::parse(&command).is_err());
    }

    #[test]
    fn test_parse_damage_with_source() {
        let parsed = event("|-damage|p2a: Moltres|0 fnt|[from] Stealth Rock");

        match parsed {
            BattleEvent::Damage {
                hp_status, from, ..
            } => {
                assert!(hp_status.unwrap().is_fainted());
                assert_eq!(from.as_deref(), Some("Stealth Rock"));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        let helmet = event("|-damage|p1a: Garchomp|80/100|[from] item: Rocky Helmet|[of] p2a: Ferrothorn");
        assert!(matches!(
            helmet,
            BattleEvent::Damage { of: Some(ref of), .. } if of.name == "Ferrothorn"
        ));
    }

    #[test]
    fn test_parse_enditem() {
        assert_eq!(
            event("|-enditem|p1a: Garchomp|Sitrus Berry|[eat]"),
            BattleEvent::EndItem {
                pokemon: SlotToken::parse("p1a: Garchomp").unwrap(),
                item: "Sitrus Berry".to_string(),
                from: None,
                eat: true,
            }
        );
    }

    #[test]
    fn test_parse_sidestart() {
        assert_eq!(
            event("|-sidestart|p2: Bob|move: Stealth Rock"),
            BattleEvent::SideStart {
                side: Player::P2,
                condition: "move: Stealth Rock".to_string(),
            }
        );
    }

    #[test]
    fn test_presentation_is_not_an_event() {
        let command = parse_line("|c|Alice|gg").unwrap();
        assert!(BattleEvent::parse(&command).is_err());

        let unknown = parse_line("|-newthing|x").unwrap();
        assert!(BattleEvent::parse(&unknown).is_err());
    }

    #[test]
    fn test_to_id() {
        assert_eq!(to_id("[Gen 9] OU"), "gen9ou");
        assert_eq!(to_id("Random Battle"), "randombattle");
    }
}
