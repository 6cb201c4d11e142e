//! Piece catalog tests

use quintris::core::GamePiece;
use quintris::types::PIECE_KINDS;

#[test]
fn catalog_has_fifteen_types() {
    for id in 0..PIECE_KINDS {
        let piece = GamePiece::from_type(id).unwrap();
        assert_eq!(piece.type_id(), id);
        assert_eq!(piece.rotation(), 0);
        assert!(!piece.name().is_empty());
    }
    assert!(GamePiece::from_type(PIECE_KINDS).is_none());
}

#[test]
fn colour_indices_cover_one_through_fifteen() {
    let colours: Vec<u8> = (0..PIECE_KINDS)
        .map(|id| GamePiece::from_type(id).unwrap().colour_index())
        .collect();
    assert_eq!(colours, (1..=PIECE_KINDS).collect::<Vec<u8>>());
}

#[test]
fn four_quarter_turns_restore_every_piece() {
    for id in 0..PIECE_KINDS {
        let piece = GamePiece::from_type(id).unwrap();
        let mut turned = piece;
        for quarter in 1..=4 {
            turned = turned.rotated();
            if quarter < 4 {
                assert_eq!(turned.rotation(), quarter);
            }
        }
        assert_eq!(turned, piece);
    }
}

#[test]
fn rotation_preserves_block_count() {
    for id in 0..PIECE_KINDS {
        let piece = GamePiece::from_type(id).unwrap();
        let blocks = piece.blocks().len();
        let mut turned = piece;
        for _ in 0..3 {
            turned = turned.rotated();
            assert_eq!(turned.blocks().len(), blocks);
        }
    }
}

#[test]
fn every_pattern_fits_the_three_by_three() {
    for id in 0..PIECE_KINDS {
        let piece = GamePiece::from_type(id).unwrap();
        for (dx, dy) in piece.blocks() {
            assert!((-1..=1).contains(&dx));
            assert!((-1..=1).contains(&dy));
        }
        assert!(!piece.blocks().is_empty());
    }
}
