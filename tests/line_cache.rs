mod common;

use reins_cache::{LineCache, LineKey, Region};

fn yamanote(station: &str) -> LineKey {
    LineKey::new(Region::EasternJapan, "東京都", "JR山手線").station(station)
}

#[tokio::test]
async fn upsert_twice_returns_the_same_row() {
    let db = common::cache_db().await;
    let cache = LineCache::new(db);

    let first = cache.upsert(&yamanote("渋谷"), Some(0)).await.unwrap();
    let second = cache.upsert(&yamanote("渋谷"), None).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.station_order, Some(0));
    assert_eq!(second.created_at, first.created_at);
    assert!(second.created_at <= second.updated_at);
}

#[tokio::test]
async fn upsert_with_order_overwrites_the_stored_order() {
    let db = common::cache_db().await;
    let cache = LineCache::new(db);

    let first = cache.upsert(&yamanote("原宿"), None).await.unwrap();
    assert_eq!(first.station_order, None);

    let second = cache.upsert(&yamanote("原宿"), Some(4)).await.unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.station_order, Some(4));
}

#[tokio::test]
async fn line_without_station_is_unique_too() {
    let db = common::cache_db().await;
    let cache = LineCache::new(db);

    let key = LineKey::new(Region::Kinki, "大阪府", "大阪メトロ御堂筋線");
    let first = cache.upsert(&key, None).await.unwrap();
    let second = cache.upsert(&key, None).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.station, None);
}

#[tokio::test]
async fn find_by_line_orders_stations_with_absent_order_last() {
    let db = common::cache_db().await;
    let cache = LineCache::new(db);

    let c = cache.upsert(&yamanote("新宿"), Some(3)).await.unwrap();
    let unordered_a = cache.upsert(&yamanote("品川"), None).await.unwrap();
    let a = cache.upsert(&yamanote("渋谷"), Some(1)).await.unwrap();
    let unordered_b = cache.upsert(&yamanote("上野"), None).await.unwrap();
    let b = cache.upsert(&yamanote("原宿"), Some(2)).await.unwrap();
    let tie = cache.upsert(&yamanote("代々木"), Some(2)).await.unwrap();
    cache
        .upsert(&LineKey::new(Region::EasternJapan, "東京都", "東急東横線").station("渋谷"), Some(0))
        .await
        .unwrap();

    let ordered = cache.find_by_line("東京都", "JR山手線").await.unwrap();
    let ids: Vec<i32> = ordered.iter().map(|line| line.id).collect();
    assert_eq!(ids, vec![a.id, b.id, tie.id, c.id, unordered_a.id, unordered_b.id]);

    let present: Vec<i32> = ordered.iter().filter_map(|line| line.station_order).collect();
    assert!(present.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[tokio::test]
async fn find_by_prefecture_is_lazy_and_restartable() {
    let db = common::cache_db().await;
    let cache = LineCache::new(db);

    cache
        .add_line(Region::EasternJapan, "東京都", "JR山手線", &["東京", "有楽町", "新橋"])
        .await
        .unwrap();
    cache
        .add_line(Region::Kinki, "大阪府", "JR大阪環状線", &["大阪", "天満"])
        .await
        .unwrap();

    let mut scan = cache.scan_by_prefecture("東京都", 2);
    assert_eq!(scan.next_page().await.unwrap().unwrap().len(), 2);
    assert_eq!(scan.next_page().await.unwrap().unwrap().len(), 1);
    assert!(scan.next_page().await.unwrap().is_none());

    scan.rewind();
    let first = scan.next_page().await.unwrap().unwrap();
    assert_eq!(first[0].station.as_deref(), Some("東京"));

    let all = cache.find_by_prefecture("大阪府").collect_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|line| line.region == Region::Kinki));

    assert!(cache.find_by_prefecture("沖縄県").collect_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn add_line_keeps_existing_stations() {
    let db = common::cache_db().await;
    let cache = LineCache::new(db);

    assert!(!cache.has_line("東京都", "JR山手線").await.unwrap());

    let added = cache
        .add_line(Region::EasternJapan, "東京都", "JR山手線", &["東京", "神田", "秋葉原"])
        .await
        .unwrap();
    assert_eq!(added, 3);
    assert!(cache.has_line("東京都", "JR山手線").await.unwrap());

    let added = cache
        .add_line(Region::EasternJapan, "東京都", "JR山手線", &["東京", "神田", "秋葉原", "御徒町"])
        .await
        .unwrap();
    assert_eq!(added, 1);

    assert_eq!(
        cache.stations("東京都", "JR山手線").await.unwrap(),
        vec!["東京", "神田", "秋葉原", "御徒町"]
    );
}

#[tokio::test]
async fn add_line_appends_new_stations_after_the_cached_ones() {
    let db = common::cache_db().await;
    let cache = LineCache::new(db);

    cache
        .add_line(Region::EasternJapan, "東京都", "JR山手線", &["東京", "神田", "秋葉原"])
        .await
        .unwrap();
    let added = cache
        .add_line(Region::EasternJapan, "東京都", "JR山手線", &["御徒町"])
        .await
        .unwrap();
    assert_eq!(added, 1);

    let added = cache
        .add_line(Region::EasternJapan, "東京都", "JR山手線", &["神田", "上野", "鶯谷"])
        .await
        .unwrap();
    assert_eq!(added, 2);

    let stations = cache.find_by_line("東京都", "JR山手線").await.unwrap();
    let orders = stations.iter().map(|line| line.station_order).collect::<Vec<_>>();
    assert_eq!(orders, vec![Some(0), Some(1), Some(2), Some(3), Some(4), Some(5)]);
    assert_eq!(
        cache.stations("東京都", "JR山手線").await.unwrap(),
        vec!["東京", "神田", "秋葉原", "御徒町", "上野", "鶯谷"]
    );
}

#[tokio::test]
async fn zero_page_size_still_yields_rows() {
    let db = common::cache_db().await;
    let cache = LineCache::new(db);
    cache
        .add_line(Region::Kinki, "大阪府", "JR大阪環状線", &["大阪", "天満"])
        .await
        .unwrap();

    let all = cache.scan_by_prefecture("大阪府", 0).collect_all().await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn line_names_are_distinct_and_sorted() {
    let db = common::cache_db().await;
    let cache = LineCache::new(db);

    cache
        .add_line(Region::EasternJapan, "東京都", "B線", &["一", "二"])
        .await
        .unwrap();
    cache
        .add_line(Region::EasternJapan, "東京都", "A線", &["三"])
        .await
        .unwrap();

    assert_eq!(cache.line_names("東京都").await.unwrap(), vec!["A線", "B線"]);
    assert!(cache.line_names("大阪府").await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_reports_whether_a_row_was_removed() {
    let db = common::cache_db().await;
    let cache = LineCache::new(db);

    let row = cache.upsert(&yamanote("目黒"), Some(10)).await.unwrap();
    assert!(cache.delete(row.id).await.unwrap());
    assert!(!cache.delete(row.id).await.unwrap());
    assert!(cache.find_by_line("東京都", "JR山手線").await.unwrap().is_empty());
}

#[tokio::test]
async fn upsert_rejects_empty_line_name() {
    let db = common::cache_db().await;
    let cache = LineCache::new(db);

    let err = cache
        .upsert(&LineKey::new(Region::EasternJapan, "東京都", ""), None)
        .await
        .unwrap_err();
    assert!(err.is_constraint_violation());
}
