//! Unit tests for rai-osm.
//!
//! No test touches real OSM data or the real tools: extracts come from a stub
//! [`FeatureSource`](crate::FeatureSource) and tool calls go to binaries that
//! do not exist.

#[cfg(test)]
mod helpers {
    use std::cell::Cell;
    use std::path::Path;

    use geo::{Geometry, LineString};

    use rai_core::Crs;
    use rai_spatial::GeoFrame;

    use crate::{FeatureSource, OsmError, OsmResult, RoadTag};

    /// East-west line along the equator from lon 0 to `deg`.
    pub fn equator(deg: f64) -> Geometry<f64> {
        Geometry::LineString(LineString::from(vec![(0.0, 0.0), (deg, 0.0)]))
    }

    pub fn tagged(rows: Vec<(Geometry<f64>, &str)>) -> GeoFrame<RoadTag> {
        GeoFrame::from_rows(
            Crs::WGS84,
            rows.into_iter().map(|(g, t)| (g, RoadTag { highway: t.to_string() })),
        )
        .unwrap()
    }

    pub fn repeat(tag: &str, n: usize, deg: f64) -> Vec<(Geometry<f64>, &str)> {
        (0..n).map(|_| (equator(deg), tag)).collect()
    }

    /// Fails `fail_first` times, then returns a clone of `frame`.
    pub struct StubSource {
        pub frame:      GeoFrame<RoadTag>,
        pub fail_first: usize,
        pub calls:      Cell<usize>,
    }

    impl StubSource {
        pub fn new(frame: GeoFrame<RoadTag>, fail_first: usize) -> Self {
            Self { frame, fail_first, calls: Cell::new(0) }
        }
    }

    impl FeatureSource for StubSource {
        fn read(&self, path: &Path) -> OsmResult<GeoFrame<RoadTag>> {
            let n = self.calls.get();
            self.calls.set(n + 1);
            if n < self.fail_first {
                Err(OsmError::Read { path: path.to_path_buf(), message: "not ready".into() })
            } else {
                Ok(self.frame.clone())
            }
        }
    }
}

// ── Classification ────────────────────────────────────────────────────────────

#[cfg(test)]
mod classify_tests {
    use crate::{classify, OsmError, RoadClass, KNOWN_TAGS};

    #[test]
    fn every_known_tag_has_a_class() {
        for tag in KNOWN_TAGS {
            assert!(RoadClass::lookup(tag).is_some(), "{tag} unmapped");
        }
    }

    #[test]
    fn trunk_roads_are_primary() {
        for tag in ["motorway", "motorway_link", "trunk", "trunk_link", "primary", "primary_link"] {
            assert_eq!(classify(tag).unwrap(), RoadClass::Primary);
        }
    }

    #[test]
    fn representative_classes() {
        assert_eq!(classify("road").unwrap(), RoadClass::Secondary);
        assert_eq!(classify("residential").unwrap(), RoadClass::Tertiary);
        assert_eq!(classify("living_street").unwrap(), RoadClass::Tertiary);
        assert_eq!(classify("track_grade3").unwrap(), RoadClass::Track);
        assert_eq!(classify("services").unwrap(), RoadClass::Track);
        assert_eq!(classify("footway").unwrap(), RoadClass::Other);
        assert_eq!(classify("ohm:military:Trench").unwrap(), RoadClass::Other);
    }

    #[test]
    fn every_class_is_reachable() {
        for class in RoadClass::ALL {
            assert!(KNOWN_TAGS.iter().any(|t| RoadClass::lookup(t) == Some(class)));
        }
    }

    #[test]
    fn unknown_tag_is_an_error() {
        match classify("hovercraft_lane") {
            Err(OsmError::UnknownRoadTag(t)) => assert_eq!(t, "hovercraft_lane"),
            other => panic!("expected UnknownRoadTag, got {other:?}"),
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(RoadClass::lookup("Primary"), None);
    }

    #[test]
    fn display_names() {
        assert_eq!(RoadClass::Track.to_string(), "track");
        assert_eq!(RoadClass::Secondary.as_str(), "secondary");
    }
}

// ── Geodesic length ───────────────────────────────────────────────────────────

#[cfg(test)]
mod length_tests {
    use geo::{Geometry, LineString, MultiLineString, Point};

    use super::helpers::equator;
    use crate::line_length;

    /// Equatorial radius × π / 180, in km.
    const KM_PER_EQUATOR_DEGREE: f64 = 111.319_490_793;

    #[test]
    fn one_degree_along_equator() {
        let km = line_length(&equator(1.0));
        assert!((km - KM_PER_EQUATOR_DEGREE).abs() < 1e-3, "got {km}");
    }

    #[test]
    fn multilinestring_sums_parts() {
        let part = |x0: f64| LineString::from(vec![(x0, 0.0), (x0 + 1.0, 0.0)]);
        let mls = Geometry::MultiLineString(MultiLineString::new(vec![part(0.0), part(10.0)]));
        let km = line_length(&mls);
        assert!((km - 2.0 * KM_PER_EQUATOR_DEGREE).abs() < 2e-3, "got {km}");
    }

    #[test]
    fn vertices_add_up() {
        let ls = Geometry::LineString(LineString::from(vec![(0.0, 0.0), (0.5, 0.0), (1.0, 0.0)]));
        assert!((line_length(&ls) - line_length(&equator(1.0))).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_latitude_swaps_axes() {
        // Stored as (lat, lon): lon 100..101 along the equator.
        let swapped = Geometry::LineString(LineString::from(vec![(0.0, 100.0), (0.0, 101.0)]));
        let km = line_length(&swapped);
        assert!((km - KM_PER_EQUATOR_DEGREE).abs() < 1e-3, "got {km}");
    }

    #[test]
    fn points_have_no_length() {
        assert_eq!(line_length(&Geometry::Point(Point::new(3.0, 4.0))), 0.0);
    }

    #[test]
    fn single_vertex_has_no_length() {
        let ls = Geometry::LineString(LineString::from(vec![(3.0, 4.0)]));
        assert_eq!(line_length(&ls), 0.0);
    }
}

// ── External tools ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tools_tests {
    use std::path::Path;

    use crate::{ogr2ogr_args, ExternalTools, LineKind, OsmError};

    fn missing() -> ExternalTools {
        ExternalTools {
            osmconvert: "rai-test-no-such-osmconvert".into(),
            ogr2ogr:    "rai-test-no-such-ogr2ogr".into(),
        }
    }

    #[test]
    fn default_binaries() {
        let t = ExternalTools::default();
        assert_eq!(t.osmconvert, "osmconvert64");
        assert_eq!(t.ogr2ogr, "ogr2ogr");
    }

    #[test]
    fn ogr2ogr_selects_attribute() {
        let args = ogr2ogr_args(LineKind::Highway);
        assert_eq!(args[0], "-overwrite");
        assert!(args.contains(&"ESRI Shapefile".to_string()));
        assert!(args.contains(&"SELECT highway FROM lines WHERE highway IS NOT NULL".to_string()));
        assert!(args.contains(&"ENCODING=UTF-8".to_string()));

        let rail = ogr2ogr_args(LineKind::Railway);
        assert!(rail.contains(&"SELECT railway FROM lines WHERE railway IS NOT NULL".to_string()));
    }

    #[test]
    fn missing_binary_is_spawn_error() {
        let err = missing().clip_osm(Path::new("a.pbf"), Path::new("a.poly"), Path::new("b.pbf"));
        match err {
            Err(OsmError::ToolSpawn { tool, .. }) => assert_eq!(tool, "rai-test-no-such-osmconvert"),
            other => panic!("expected ToolSpawn, got {other:?}"),
        }
    }

    #[test]
    fn extract_uses_ogr2ogr() {
        let err = missing().extract_osm_rail(Path::new("a.shp"), Path::new("a.pbf"));
        assert!(matches!(err, Err(OsmError::ToolSpawn { ref tool, .. }) if tool == "rai-test-no-such-ogr2ogr"));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_failure() {
        let tools = ExternalTools { osmconvert: "false".into(), ogr2ogr: "false".into() };
        let err = tools.extract_osm(Path::new("a.shp"), Path::new("a.pbf"));
        match err {
            Err(OsmError::ToolFailed { tool, status }) => {
                assert_eq!(tool, "false");
                assert!(!status.success());
            }
            other => panic!("expected ToolFailed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_is_success() {
        let tools = ExternalTools { osmconvert: "true".into(), ogr2ogr: "true".into() };
        assert!(tools.clip_osm(Path::new("a"), Path::new("b"), Path::new("c")).is_ok());
    }
}

// ── Reading with retry ────────────────────────────────────────────────────────

#[cfg(test)]
mod reader_tests {
    use std::path::Path;
    use std::time::Duration;

    use super::helpers::{equator, tagged, StubSource};
    use crate::{read_with_retry, OsmError};

    const NO_WAIT: [Duration; 2] = [Duration::ZERO, Duration::ZERO];

    #[test]
    fn first_success_reads_once() {
        let src = StubSource::new(tagged(vec![(equator(1.0), "track")]), 0);
        let frame = read_with_retry(&src, Path::new("x.shp"), &NO_WAIT).unwrap();
        assert_eq!(frame.len(), 1);
        assert_eq!(src.calls.get(), 1);
    }

    #[test]
    fn recovers_on_last_attempt() {
        let src = StubSource::new(tagged(vec![(equator(1.0), "track")]), 2);
        let frame = read_with_retry(&src, Path::new("x.shp"), &NO_WAIT).unwrap();
        assert_eq!(frame.len(), 1);
        assert_eq!(src.calls.get(), 3);
    }

    #[test]
    fn gives_up_after_all_delays() {
        let src = StubSource::new(tagged(vec![]), 3);
        let err = read_with_retry(&src, Path::new("x.shp"), &NO_WAIT);
        assert!(matches!(err, Err(OsmError::Read { .. })));
        assert_eq!(src.calls.get(), 3);
    }

    #[test]
    fn no_delays_means_one_attempt() {
        let src = StubSource::new(tagged(vec![]), 1);
        assert!(read_with_retry(&src, Path::new("x.shp"), &[]).is_err());
        assert_eq!(src.calls.get(), 1);
    }
}

// ── Pipeline stages ───────────────────────────────────────────────────────────

#[cfg(test)]
mod country_tests {
    use std::fs;

    use tempfile::TempDir;

    use rai_core::PrepConfig;

    use super::helpers::{equator, repeat, tagged, StubSource};
    use crate::{
        filter_by_length, filter_common_tags, get_country, map_roads, ExternalTools, MeasuredRoad,
        OsmError, RoadClass,
    };

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    /// Config rooted in `dir` with the clipped PBF and shapefile already present.
    fn prepared(dir: &TempDir, country: &str) -> PrepConfig {
        let config = PrepConfig {
            base_path:         dir.path().to_path_buf(),
            retry_delays_secs: vec![],
            osmconvert_bin:    "rai-test-no-such-osmconvert".into(),
            ogr2ogr_bin:       "rai-test-no-such-ogr2ogr".into(),
            ..PrepConfig::default()
        };
        let paths = config.country_paths(country);
        for p in [&paths.pbf, &paths.shp] {
            fs::create_dir_all(p.parent().unwrap()).unwrap();
            fs::write(p, b"").unwrap();
        }
        config
    }

    #[test]
    fn rare_tags_dropped_trunk_tags_kept() {
        let mut rows = repeat("residential", 21, 0.1);
        rows.extend(repeat("footway", 20, 0.1));
        rows.extend(repeat("motorway", 1, 0.1));
        rows.extend(repeat("bridleway", 1, 0.1));
        let kept = filter_common_tags(tagged(rows), 20);

        assert_eq!(kept.len(), 22);
        assert!(kept.iter().all(|r| r.attrs.highway == "residential" || r.attrs.highway == "motorway"));
    }

    #[test]
    fn common_tag_filter_preserves_ids() {
        let mut rows = repeat("footway", 1, 0.1);
        rows.extend(repeat("primary", 1, 0.1));
        let kept = filter_common_tags(tagged(rows), 20);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.records()[0].id.0, 1);
    }

    #[test]
    fn length_filter_threshold() {
        // 500 km along the equator is ~4.4916°.
        let frame = tagged(vec![(equator(4.45), "primary"), (equator(4.55), "primary")]);
        let kept = filter_by_length(frame, 500.0);

        assert_eq!(kept.len(), 1);
        let d = kept.records()[0].attrs.distance_km.unwrap();
        assert!(d < 500.0 && d > 490.0, "got {d}");
    }

    #[test]
    fn map_roads_fails_on_unknown_tag() {
        let frame = tagged(vec![(equator(0.1), "primary"), (equator(0.1), "moon_road")])
            .map_attrs(|_, t| MeasuredRoad { highway: t.highway, distance_km: None });
        assert!(matches!(map_roads(frame), Err(OsmError::UnknownRoadTag(t)) if t == "moon_road"));
    }

    #[test]
    fn pipeline_with_existing_extract() {
        let dir = tmp();
        let config = prepared(&dir, "Narnia");

        let mut rows = repeat("residential", 21, 0.1);
        rows.extend(repeat("residential", 1, 6.0));
        rows.extend(repeat("footway", 2, 0.1));
        rows.extend(repeat("trunk", 1, 0.2));
        let src = StubSource::new(tagged(rows), 0);

        let tools = ExternalTools::from_config(&config);
        let roads = get_country(&config, "Narnia", &tools, &src).unwrap();

        assert_eq!(roads.len(), 22);
        assert!(roads.iter().all(|r| r.attrs.distance_km.is_some_and(|d| d < 500.0)));
        let primary = roads.iter().filter(|r| r.attrs.roads == RoadClass::Primary).count();
        assert_eq!(primary, 1);
    }

    #[test]
    fn rai_mode_skips_lengths() {
        let dir = tmp();
        let config = PrepConfig { rai: true, ..prepared(&dir, "Narnia") };

        let mut rows = repeat("residential", 21, 0.1);
        rows.extend(repeat("residential", 1, 6.0));
        let src = StubSource::new(tagged(rows), 0);

        let roads = get_country(&config, "Narnia", &ExternalTools::from_config(&config), &src).unwrap();
        assert_eq!(roads.len(), 22);
        assert!(roads.iter().all(|r| r.attrs.distance_km.is_none()));
    }

    #[test]
    fn overwrite_reruns_extraction() {
        let dir = tmp();
        let config = PrepConfig { overwrite: true, ..prepared(&dir, "Narnia") };
        let src = StubSource::new(tagged(vec![]), 0);

        let err = get_country(&config, "Narnia", &ExternalTools::from_config(&config), &src);
        assert!(matches!(err, Err(OsmError::ToolSpawn { ref tool, .. }) if tool == "rai-test-no-such-ogr2ogr"));
        assert_eq!(src.calls.get(), 0);
    }

    #[test]
    fn missing_pbf_runs_clip() {
        let dir = tmp();
        let config = PrepConfig {
            base_path:      dir.path().to_path_buf(),
            osmconvert_bin: "rai-test-no-such-osmconvert".into(),
            ..PrepConfig::default()
        };
        let src = StubSource::new(tagged(vec![]), 0);

        let err = get_country(&config, "Narnia", &ExternalTools::from_config(&config), &src);
        assert!(matches!(err, Err(OsmError::ToolSpawn { ref tool, .. }) if tool == "rai-test-no-such-osmconvert"));
        assert!(dir.path().join("osm_country").is_dir());
    }

    #[test]
    fn invalid_config_rejected_before_any_work() {
        let dir = tmp();
        let config = PrepConfig { max_segment_km: 0.0, ..prepared(&dir, "Narnia") };
        let src = StubSource::new(tagged(vec![]), 0);

        let err = get_country(&config, "Narnia", &ExternalTools::from_config(&config), &src);
        assert!(matches!(err, Err(OsmError::Core(_))));
        assert_eq!(src.calls.get(), 0);
    }
}

// ── Summary ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod summary_tests {
    use std::fs;

    use rai_core::Crs;
    use rai_spatial::GeoFrame;

    use super::helpers::equator;
    use crate::{summarize, write_summary_csv, Road, RoadClass, RoadSummaryRow};

    fn road(class: RoadClass, km: Option<f64>) -> Road {
        Road { highway: class.to_string(), distance_km: km, roads: class }
    }

    fn sample() -> GeoFrame<Road> {
        GeoFrame::from_rows(
            Crs::WGS84,
            vec![
                (equator(0.1), road(RoadClass::Track, Some(1.5))),
                (equator(0.1), road(RoadClass::Primary, Some(2.0))),
                (equator(0.1), road(RoadClass::Track, Some(0.5))),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rows_per_present_class_in_order() {
        let rows = summarize(&sample());
        assert_eq!(
            rows,
            vec![
                RoadSummaryRow { roads: RoadClass::Primary, segments: 1, total_km: Some(2.0) },
                RoadSummaryRow { roads: RoadClass::Track, segments: 2, total_km: Some(2.0) },
            ]
        );
    }

    #[test]
    fn unmeasured_class_has_no_total() {
        let frame = GeoFrame::from_rows(
            Crs::WGS84,
            vec![
                (equator(0.1), road(RoadClass::Other, Some(1.0))),
                (equator(0.1), road(RoadClass::Other, None)),
            ],
        )
        .unwrap();
        let rows = summarize(&frame);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].segments, 2);
        assert_eq!(rows[0].total_km, None);
    }

    #[test]
    fn csv_output() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("summary.csv");
        let mut rows = summarize(&sample());
        rows.push(RoadSummaryRow { roads: RoadClass::Other, segments: 4, total_km: None });
        write_summary_csv(&path, &rows).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            ["roads,segments,total_km", "primary,1,2.000", "track,2,2.000", "other,4,"]
        );
    }
}

// ── Shapefile reader ──────────────────────────────────────────────────────────

#[cfg(all(test, feature = "shapefile"))]
mod shapefile_tests {
    use std::path::Path;

    use geo::Geometry;
    use shapefile::dbase::{FieldValue, Record, TableWriterBuilder};
    use shapefile::{Point, Polyline, Writer};
    use tempfile::TempDir;

    use crate::{read_with_retry, FeatureSource, OsmError, ShapefileSource};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    /// One short east-west polyline per row; `rows[k][c]` fills `columns[c]`.
    fn write_lines(path: &Path, columns: &[&str], rows: &[Vec<Option<&str>>]) {
        let mut table = TableWriterBuilder::new();
        for &name in columns {
            table = table.add_character_field(name.try_into().unwrap(), 32);
        }
        let mut writer = Writer::from_path(path, table).unwrap();
        for (k, values) in rows.iter().enumerate() {
            let x = k as f64;
            let shape = Polyline::new(vec![Point::new(x, 0.0), Point::new(x + 0.5, 0.0)]);
            let mut record = Record::default();
            for (&name, value) in columns.iter().zip(values) {
                record.insert(name.to_string(), FieldValue::Character(value.map(str::to_string)));
            }
            writer.write_shape_and_record(&shape, &record).unwrap();
        }
    }

    fn tags(frame: &rai_spatial::GeoFrame<crate::RoadTag>) -> Vec<&str> {
        frame.iter().map(|r| r.attrs.highway.as_str()).collect()
    }

    #[test]
    fn reads_highway_and_skips_blank_tags() {
        let dir = tmp();
        let path = dir.path().join("roads.shp");
        write_lines(
            &path,
            &["highway"],
            &[vec![Some("primary")], vec![Some("   ")], vec![None], vec![Some("track")]],
        );

        let frame = ShapefileSource.read(&path).unwrap();
        assert_eq!(tags(&frame), ["primary", "track"]);
        assert_eq!(frame.crs(), rai_core::Crs::WGS84);
        assert!(frame.iter().all(|r| matches!(r.geometry, Geometry::MultiLineString(_))));
    }

    #[test]
    fn falls_back_to_fclass() {
        let dir = tmp();
        let only_fclass = dir.path().join("geofabrik.shp");
        write_lines(&only_fclass, &["fclass"], &[vec![Some("residential")]]);
        assert_eq!(tags(&ShapefileSource.read(&only_fclass).unwrap()), ["residential"]);

        let both = dir.path().join("both.shp");
        write_lines(
            &both,
            &["highway", "fclass"],
            &[vec![Some("trunk"), Some("service")], vec![None, Some("service")]],
        );
        assert_eq!(tags(&ShapefileSource.read(&both).unwrap()), ["trunk", "service"]);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tmp();
        let path = dir.path().join("absent.shp");
        match ShapefileSource.read(&path) {
            Err(OsmError::Read { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Read error, got {other:?}"),
        }
        assert!(read_with_retry(&ShapefileSource, &path, &[]).is_err());
    }
}
