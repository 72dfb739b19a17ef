mod common;

use album_rankings::database::{self, rankings};
use album_rankings::errors::RankingValidationError;
use common::{entries, TestDb};

#[test]
fn test_album_ranking_replaces_previous_submission() {
    let db = TestDb::new();
    let user = db.user("ana", Some("Brazil"));
    let red = db.album("Red");
    let lover = db.album("Lover");
    let folklore = db.album("Folklore");

    db.rank_albums(user, &[(red, 1), (lover, 2), (folklore, 3)]);
    db.rank_albums(user, &[(folklore, 1), (red, 2)]);

    let rows = rankings::list_album_rows_for_user(&mut db.conn(), user).unwrap();
    let positions: Vec<(i64, u32)> = rows.iter().map(|r| (r.item_id, r.position)).collect();
    assert_eq!(positions, vec![(folklore, 1), (red, 2)]);
}

#[test]
fn test_duplicate_positions_are_rejected_and_nothing_changes() {
    let db = TestDb::new();
    let user = db.user("ana", Some("Brazil"));
    let red = db.album("Red");
    let lover = db.album("Lover");
    db.rank_albums(user, &[(red, 1), (lover, 2)]);

    let err = rankings::replace_album_rankings(&mut db.conn(), user, &entries(&[(red, 1), (lover, 1)]))
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<RankingValidationError>(),
        Some(&RankingValidationError::DuplicatePosition(1))
    );

    let rows = rankings::list_album_rows_for_user(&mut db.conn(), user).unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_position_zero_is_rejected() {
    let db = TestDb::new();
    let user = db.user("ana", None);
    let red = db.album("Red");

    let err = rankings::replace_album_rankings(&mut db.conn(), user, &entries(&[(red, 0)])).unwrap_err();
    assert_eq!(
        err.downcast_ref::<RankingValidationError>(),
        Some(&RankingValidationError::InvalidPosition(0))
    );
}

#[test]
fn test_track_ranking_must_stay_inside_album() {
    let db = TestDb::new();
    let user = db.user("ana", None);
    let red = db.album("Red");
    let lover = db.album("Lover");
    let state_of_grace = db.track(red, "State of Grace", 1);
    let cruel_summer = db.track(lover, "Cruel Summer", 2);

    let err = rankings::replace_track_rankings(
        &mut db.conn(),
        user,
        red,
        &entries(&[(state_of_grace, 1), (cruel_summer, 2)]),
    )
    .unwrap_err();
    assert_eq!(
        err.downcast_ref::<RankingValidationError>(),
        Some(&RankingValidationError::TrackOutsideAlbum { track_id: cruel_summer, album_id: red })
    );
}

#[test]
fn test_track_ranking_replace_only_touches_one_album() {
    let db = TestDb::new();
    let ana = db.user("ana", None);
    let bia = db.user("bia", None);
    let red = db.album("Red");
    let lover = db.album("Lover");
    let red_1 = db.track(red, "State of Grace", 1);
    let red_2 = db.track(red, "Red", 2);
    let lover_1 = db.track(lover, "I Forgot That You Existed", 1);
    let lover_2 = db.track(lover, "Cruel Summer", 2);

    for user in [ana, bia] {
        db.rank_tracks(user, red, &[(red_1, 1), (red_2, 2)]);
        db.rank_tracks(user, lover, &[(lover_1, 1), (lover_2, 2)]);
    }
    db.rank_tracks(ana, red, &[(red_2, 1), (red_1, 2)]);

    let shared_red = rankings::list_shared_track_positions(&mut db.conn(), ana, bia, red).unwrap();
    let red_positions: Vec<(i64, u32, u32)> =
        shared_red.iter().map(|r| (r.item_id, r.position_a, r.position_b)).collect();
    assert_eq!(red_positions, vec![(red_1, 2, 1), (red_2, 1, 2)]);

    let shared_lover = rankings::list_shared_track_positions(&mut db.conn(), ana, bia, lover).unwrap();
    assert!(shared_lover.iter().all(|r| r.position_a == r.position_b));
    assert_eq!(shared_lover.len(), 2);
}

#[test]
fn test_shared_positions_skip_deleted_albums() {
    let db = TestDb::new();
    let ana = db.user("ana", None);
    let bia = db.user("bia", None);
    let red = db.album("Red");
    let lover = db.album("Lover");
    db.rank_albums(ana, &[(red, 1), (lover, 2)]);
    db.rank_albums(bia, &[(red, 2), (lover, 1)]);

    assert!(database::catalog::delete_album(&mut db.conn(), lover).unwrap());

    let shared = rankings::list_shared_album_positions(&mut db.conn(), ana, bia).unwrap();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].item_id, red);

    // the dangling rows themselves are kept
    let rows = rankings::list_album_rows_for_user(&mut db.conn(), ana).unwrap();
    assert_eq!(rows.len(), 2);
}
