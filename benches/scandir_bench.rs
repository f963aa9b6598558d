use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use scandir::fs::ListDir;
use scandir::{Walk, scandir, scandir_with, walk};
use std::hint::black_box;
use std::path::Path;
use tempfile::TempDir;

const DIRS: usize = 20;
const FILES_PER_DIR: usize = 100;

// a flat directory of DIRS subdirectories, each holding FILES_PER_DIR files
fn make_tree() -> TempDir {
    let root = tempfile::tempdir().expect("failed to create bench dir");
    for d in 0..DIRS {
        let dir = root.path().join(format!("dir_{d}"));
        std::fs::create_dir(&dir).expect("failed to create dir");
        for f in 0..FILES_PER_DIR {
            std::fs::write(dir.join(format!("file_{f}.txt")), b"bench").expect("failed to write file");
        }
    }
    root
}

fn count_dirs_scandir(path: &Path) -> usize {
    scandir(path)
        .map(|entries| entries.flatten().filter(|entry| entry.is_dir()).count())
        .unwrap_or(0)
}

fn count_dirs_std(path: &Path) -> usize {
    std::fs::read_dir(path)
        .map(|entries| {
            entries
                .flatten()
                .filter(|entry| std::fs::symlink_metadata(entry.path()).is_ok_and(|m| m.is_dir()))
                .count()
        })
        .unwrap_or(0)
}

fn sum_sizes_std(path: &Path) -> u64 {
    std::fs::read_dir(path)
        .map(|entries| {
            entries
                .flatten()
                .filter_map(|entry| std::fs::symlink_metadata(entry.path()).ok())
                .map(|m| m.len())
                .sum()
        })
        .unwrap_or(0)
}

fn sum_sizes_scandir(path: &Path) -> u64 {
    scandir(path)
        .map(|entries| {
            entries
                .flatten()
                .filter_map(|entry| entry.lstat().ok().map(|stat| stat.size))
                .sum()
        })
        .unwrap_or(0)
}

fn bench_listing(c: &mut Criterion) {
    let tree = make_tree();
    let leaf = tree.path().join("dir_0");

    let mut group = c.benchmark_group("is_dir_listing");
    group.throughput(Throughput::Elements(FILES_PER_DIR as u64));
    group.bench_function("scandir", |b| b.iter(|| black_box(count_dirs_scandir(black_box(&leaf)))));
    group.bench_function("scandir_list_dir", |b| {
        b.iter(|| {
            let entries = scandir_with::<ListDir, _>(black_box(&leaf)).expect("open failed");
            black_box(entries.flatten().filter(|entry| entry.is_dir()).count())
        })
    });
    group.bench_function("std_read_dir", |b| b.iter(|| black_box(count_dirs_std(black_box(&leaf)))));
    group.finish();

    let mut group = c.benchmark_group("size_listing");
    group.throughput(Throughput::Elements(FILES_PER_DIR as u64));
    group.bench_function("scandir_lstat", |b| b.iter(|| black_box(sum_sizes_scandir(black_box(&leaf)))));
    group.bench_function("std_symlink_metadata", |b| {
        b.iter(|| black_box(sum_sizes_std(black_box(&leaf))))
    });
    group.finish();
}

fn bench_walk(c: &mut Criterion) {
    let tree = make_tree();

    let mut group = c.benchmark_group("walk");
    group.throughput(Throughput::Elements((DIRS * FILES_PER_DIR) as u64));
    for topdown in [true, false] {
        group.bench_with_input(BenchmarkId::new("scandir_walk", topdown), &topdown, |b, &topdown| {
            b.iter(|| {
                let files: usize = Walk::builder(black_box(tree.path()))
                    .topdown(topdown)
                    .build()
                    .map(|level| level.filenames.len())
                    .sum();
                black_box(files)
            })
        });
    }
    group.bench_function("std_recursive", |b| {
        b.iter(|| {
            let mut files = 0;
            let mut stack = vec![tree.path().to_path_buf()];
            while let Some(dir) = stack.pop() {
                for entry in std::fs::read_dir(&dir).into_iter().flatten().flatten() {
                    match std::fs::symlink_metadata(entry.path()) {
                        Ok(m) if m.is_dir() => stack.push(entry.path()),
                        Ok(_) => files += 1,
                        Err(_) => {}
                    }
                }
            }
            black_box(files)
        })
    });
    group.bench_function("scandir_walk_default", |b| {
        b.iter(|| black_box(walk(black_box(tree.path())).count()))
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(50)
        .warm_up_time(std::time::Duration::from_millis(500))
        .measurement_time(std::time::Duration::from_secs(3));
    targets = bench_listing, bench_walk
}
criterion_main!(benches);
