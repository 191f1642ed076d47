//! Cross-entity rules applied while building a manifest.

use packsmith_schema::{
    Dependency, DependencyOptions, Header, HeaderOptions, Manifest, ManifestError,
    ManifestOptions, Module, ModuleOptions, ModuleType, Subpack, SubpackOptions, Uuid, Version,
};

fn build(header: HeaderOptions, types: &[ModuleType]) -> Result<Manifest, ManifestError> {
    Manifest::new(ManifestOptions {
        header: Some(Header::new(HeaderOptions {
            name: Some("Pack".to_owned()),
            ..header
        })?),
        modules: types
            .iter()
            .map(|&t| Module::of(t))
            .collect::<Result<Vec<_>, _>>()?,
        ..ManifestOptions::default()
    })
}

#[test]
fn resources_and_data_conflict() {
    let err = build(HeaderOptions::default(), &[ModuleType::Resources, ModuleType::Data]).unwrap_err();
    assert!(matches!(
        err,
        ManifestError::TypeConflict {
            first: ModuleType::Resources,
            second: ModuleType::Data
        }
    ));
}

#[test]
fn behavior_group_types_coexist() {
    let manifest = build(
        HeaderOptions::default(),
        &[ModuleType::Data, ModuleType::ClientData, ModuleType::Interface],
    )
    .unwrap();
    assert_eq!(manifest.module_types().len(), 3);
}

#[test]
fn world_template_defaults_and_exclusions() {
    let manifest = build(HeaderOptions::default(), &[ModuleType::WorldTemplate]).unwrap();
    assert_eq!(manifest.header().base_game_version(), Some(Version::MIN_ENGINE));
    assert_eq!(manifest.header().lock_template_options(), Some(false));
    assert_eq!(manifest.header().min_engine_version(), None);

    let err = build(
        HeaderOptions {
            min_engine_version: Some(Version::new(1, 20, 0)),
            ..HeaderOptions::default()
        },
        &[ModuleType::WorldTemplate],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ManifestError::IllegalField {
            field: "min_engine_version",
            ..
        }
    ));
}

#[test]
fn base_game_version_has_lower_bound() {
    let err = build(
        HeaderOptions {
            base_game_version: Some(Version::new(1, 12, 9)),
            ..HeaderOptions::default()
        },
        &[ModuleType::WorldTemplate],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ManifestError::OutOfRange {
            field: "base_game_version",
            ..
        }
    ));

    let manifest = build(
        HeaderOptions {
            base_game_version: Some(Version::new(1, 13, 0)),
            ..HeaderOptions::default()
        },
        &[ModuleType::WorldTemplate],
    )
    .unwrap();
    assert_eq!(manifest.header().base_game_version(), Some(Version::new(1, 13, 0)));
}

#[test]
fn template_fields_need_world_template() {
    for header in [
        HeaderOptions {
            base_game_version: Some(Version::new(1, 20, 0)),
            ..HeaderOptions::default()
        },
        HeaderOptions {
            lock_template_options: Some(true),
            ..HeaderOptions::default()
        },
    ] {
        let err = build(header, &[ModuleType::Resources]).unwrap_err();
        assert!(matches!(err, ManifestError::IllegalField { .. }), "{err}");
    }
}

#[test]
fn min_engine_version_rules() {
    let manifest = build(HeaderOptions::default(), &[ModuleType::Resources]).unwrap();
    assert_eq!(manifest.header().min_engine_version(), Some(Version::MIN_ENGINE));

    let err = build(
        HeaderOptions {
            min_engine_version: Some(Version::new(1, 12, 0)),
            ..HeaderOptions::default()
        },
        &[ModuleType::Resources],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ManifestError::OutOfRange {
            field: "min_engine_version",
            ..
        }
    ));

    let v1 = Manifest::new(ManifestOptions {
        format_version: Some(1),
        header: Some(Header::named("Pack")),
        modules: vec![Module::of(ModuleType::Resources).unwrap()],
        ..ManifestOptions::default()
    })
    .unwrap();
    assert_eq!(v1.header().min_engine_version(), None);

    let skins = build(HeaderOptions::default(), &[ModuleType::SkinPack]).unwrap();
    assert_eq!(skins.header().min_engine_version(), None);
}

#[test]
fn duplicate_modules_collapse() {
    let module = Module::of(ModuleType::Resources).unwrap();
    let manifest = Manifest::new(ManifestOptions {
        header: Some(Header::named("Pack")),
        modules: vec![module.clone(), module],
        ..ManifestOptions::default()
    })
    .unwrap();
    assert_eq!(manifest.modules().len(), 1);
}

#[test]
fn dependencies_order_by_uuid_then_version() {
    let low = Uuid::from_u128(1);
    let high = Uuid::from_u128(2);
    let dep = |uuid, version| {
        Dependency::new(DependencyOptions {
            uuid: Some(uuid),
            version: Some(version),
        })
        .unwrap()
    };
    let manifest = Manifest::new(ManifestOptions {
        header: Some(Header::named("Pack")),
        modules: vec![Module::of(ModuleType::Data).unwrap()],
        dependencies: vec![
            dep(high, Version::new(1, 0, 0)),
            dep(low, Version::new(2, 0, 0)),
            dep(low, Version::new(1, 0, 0)),
        ],
        ..ManifestOptions::default()
    })
    .unwrap();
    let order: Vec<(Uuid, Version)> = manifest
        .dependencies()
        .iter()
        .map(|d| (d.uuid(), d.version()))
        .collect();
    assert_eq!(
        order,
        [
            (low, Version::new(1, 0, 0)),
            (low, Version::new(2, 0, 0)),
            (high, Version::new(1, 0, 0)),
        ]
    );
}

#[test]
fn subpacks_order_by_folder_first() {
    let subpack = |folder: &str, name: &str| {
        Subpack::new(SubpackOptions {
            folder_name: Some(folder.to_owned()),
            name: Some(name.to_owned()),
            memory_tier: None,
        })
        .unwrap()
    };
    let manifest = Manifest::new(ManifestOptions {
        header: Some(Header::named("Pack")),
        modules: vec![Module::of(ModuleType::Resources).unwrap()],
        subpacks: vec![subpack("subpacks/b", "A"), subpack("subpacks/a", "Z")],
        ..ManifestOptions::default()
    })
    .unwrap();
    let folders: Vec<&str> = manifest
        .subpacks()
        .iter()
        .map(|s| s.folder_name().as_str())
        .collect();
    assert_eq!(folders, ["subpacks/a", "subpacks/b"]);
}

#[test]
fn manifests_compare_structurally() {
    let a = Manifest::of("Pack", ModuleType::Resources).unwrap();
    let mut options = a.to_options();
    options.header = Some(
        Header::new(HeaderOptions {
            description: Some("changed".to_owned()),
            ..a.header().to_options()
        })
        .unwrap(),
    );
    let b = Manifest::new(options).unwrap();
    assert_eq!(a.header().uuid(), b.header().uuid());
    assert_ne!(a, b);
    assert_eq!(Manifest::new(a.to_options()).unwrap(), a);
}

#[test]
fn script_module_requires_entry() {
    let err = Module::new(ModuleOptions {
        module_type: Some(ModuleType::Script),
        ..ModuleOptions::default()
    })
    .unwrap_err();
    assert!(matches!(err, ManifestError::MissingField { field: "entry" }));
}
