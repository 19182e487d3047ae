mod common;

#[test]
fn test_database_lives_in_removed_temp_dir() {
    let dir = {
        let test_db = common::TestDb::new("moving.db");
        let conn = test_db.pool().get();
        assert!(conn.is_ok());
        assert!(test_db.dir().join("moving.db").exists());
        test_db.dir().to_path_buf()
    };

    assert!(!dir.exists());
}
