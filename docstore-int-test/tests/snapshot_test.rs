use docstore::collection::QueryParams;
use docstore::doc;
use docstore::errors::ErrorKind;
use docstore::store::Store;
use docstore_int_test::test_util::{
    cleanup, config, create_test_context, keys_of, populate_val_collection, run_test,
};

#[ctor::ctor]
fn init() {
    colog::init();
}

#[test]
fn test_dump_and_load_preserve_queries() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let original = populate_val_collection(&store, "vals", 7)?;
            let people = store.create_collection("people", config("id"))?;
            let _ = people.put(doc! { "id": "p1", "tags": vec!["a", "b"] });

            let loaded = Store::load(&store.dump()?)?;
            assert_eq!(loaded.collection_names(), vec!["people", "vals"]);

            let restored = loaded.get_collection("vals").unwrap();
            assert_eq!(restored.primary_key(), "key1");
            assert_eq!(restored.list_indexes(), vec!["val"]);
            for params in [
                QueryParams::ascending(),
                QueryParams::descending().min("val2").max("val4"),
                QueryParams::ascending().min("val5"),
            ] {
                assert_eq!(
                    restored.query("val", &params)?,
                    original.query("val", &params)?
                );
            }
            assert_eq!(
                loaded.get_collection("people").unwrap().get("p1"),
                people.get("p1")
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_loaded_store_is_independent() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let original = populate_val_collection(&store, "vals", 3)?;
            let loaded = Store::load(&store.dump()?)?;

            let _ = original.put(doc! { "key1": "key9", "val": "val9" });
            let restored = loaded.get_collection("vals").unwrap();
            assert!(restored.get("key9").is_none());
            assert_eq!(
                keys_of(&restored.query("val", &QueryParams::ascending())?, "key1"),
                vec!["key0", "key1", "key2"]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_save_and_reopen() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            populate_val_collection(&store, "vals", 4)?;
            store.save()?;
            assert!(ctx.snapshot_path().exists());

            let reopened = Store::builder().snapshot_path(ctx.snapshot_path()).open()?;
            let vals = reopened.get_collection("vals").unwrap();
            assert_eq!(vals.len(), 4);
            let found = vals.query("val", &QueryParams::descending().max("val2"))?;
            assert_eq!(keys_of(&found, "key1"), vec!["key2", "key1", "key0"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_dump_to_file_and_load_from_file() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            populate_val_collection(&store, "vals", 2)?;
            let path = ctx.dir().join("copy.json");

            store.dump_to_file(&path)?;
            let loaded = Store::load_from_file(&path)?;
            assert_eq!(loaded.get_collection("vals").unwrap().len(), 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_load_from_missing_file() {
    run_test(
        create_test_context,
        |ctx| {
            let err = Store::load_from_file(ctx.dir().join("absent.json")).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::FileNotFound);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_open_rejects_garbage_snapshot() {
    run_test(
        create_test_context,
        |ctx| {
            std::fs::write(ctx.snapshot_path(), b"garbage")?;
            let err = Store::builder()
                .snapshot_path(ctx.snapshot_path())
                .open()
                .err()
                .unwrap();
            assert_eq!(err.kind(), &ErrorKind::EncodingError);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_load_rejects_inconsistent_index() {
    let json = br#"{"collections":{"c":{
        "config":{"primaryKey":"id"},
        "documents":{"k1":{"fields":{"id":{"type":"string","value":"k1"}}}},
        "indexes":{"val":{"orderedValues":["a"],"lookup":{}}}
    }}}"#;
    let err = Store::load(json).err().unwrap();
    assert_eq!(err.kind(), &ErrorKind::SnapshotCorrupted);
}

#[test]
fn test_pretty_snapshot_loads_like_compact() {
    run_test(
        create_test_context,
        |_ctx| {
            let pretty = Store::builder().pretty_snapshot(true).open()?;
            let col = pretty.create_collection("c", config("id"))?;
            let _ = col.put(doc! { "id": "k1", "n": 1.5 });

            let bytes = pretty.dump()?;
            assert!(bytes.contains(&b'\n'));
            let loaded = Store::load(&bytes)?;
            assert_eq!(loaded.get_collection("c").unwrap().get("k1"), col.get("k1"));
            Ok(())
        },
        cleanup,
    )
}
