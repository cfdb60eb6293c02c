//! Oblivious transfer benchmarks using `criterion`.

use criterion::{criterion_group, criterion_main, Criterion};
use dlog::{unix_channel_pair, RistrettoGroup, ZpSafePrimeGroup};
use dlog_ot::{
    ot::{
        BatchOtReceiver, BatchOtSender, OneSidedSimulation, OtReceiver, OtSender, PrivacyOnly,
        Receiver, SemiHonest, Sender,
    },
    ProtocolConfig,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::time::Duration;

/// Number of transfers per benchmark iteration.
const T: usize = 16;

fn rand_msg_vec(size: usize) -> Vec<(Vec<u8>, Vec<u8>)> {
    (0..size)
        .map(|_| (rand::random::<[u8; 16]>().to_vec(), rand::random::<[u8; 16]>().to_vec()))
        .collect()
}

fn rand_bool_vec(size: usize) -> Vec<bool> {
    (0..size).map(|_| rand::random::<bool>()).collect()
}

fn _bench_ot<OTSender, OTReceiver>(
    mut sender_ot: OTSender,
    mut receiver_ot: OTReceiver,
    bs: &[bool],
    ms: Vec<(Vec<u8>, Vec<u8>)>,
) where
    OTSender: Sender<Msg = Vec<u8>> + Send + 'static,
    OTReceiver: Receiver<Msg = Vec<u8>>,
{
    let (mut sender, mut receiver) = unix_channel_pair();
    let handle = std::thread::spawn(move || {
        let mut rng = ChaCha20Rng::from_entropy();
        sender_ot.send(&mut sender, &ms, &mut rng).unwrap();
    });
    let mut rng = ChaCha20Rng::from_entropy();
    receiver_ot.receive(&mut receiver, bs, &mut rng).unwrap();
    handle.join().unwrap();
}

fn bench_ot(c: &mut Criterion) {
    let group = RistrettoGroup::new();
    let config = ProtocolConfig::default();
    c.bench_function("ot::SemiHonest", |bench| {
        let ms = rand_msg_vec(T);
        let bs = rand_bool_vec(T);
        bench.iter(|| {
            _bench_ot(
                OtSender::<_, SemiHonest, Vec<u8>>::new(&group, config).unwrap(),
                OtReceiver::<_, SemiHonest, Vec<u8>>::new(&group, config).unwrap(),
                &bs,
                ms.clone(),
            )
        })
    });
    c.bench_function("ot::PrivacyOnly", |bench| {
        let ms = rand_msg_vec(T);
        let bs = rand_bool_vec(T);
        bench.iter(|| {
            _bench_ot(
                OtSender::<_, PrivacyOnly, Vec<u8>>::new(&group, config).unwrap(),
                OtReceiver::<_, PrivacyOnly, Vec<u8>>::new(&group, config).unwrap(),
                &bs,
                ms.clone(),
            )
        })
    });
    c.bench_function("ot::OneSidedSimulation", |bench| {
        let ms = rand_msg_vec(T);
        let bs = rand_bool_vec(T);
        bench.iter(|| {
            _bench_ot(
                OtSender::<_, OneSidedSimulation, Vec<u8>>::new(&group, config).unwrap(),
                OtReceiver::<_, OneSidedSimulation, Vec<u8>>::new(&group, config).unwrap(),
                &bs,
                ms.clone(),
            )
        })
    });
}

fn bench_batch_ot(c: &mut Criterion) {
    let config = ProtocolConfig::default();
    let group = RistrettoGroup::new();
    c.bench_function("batch_ot::SemiHonest", |bench| {
        let ms = rand_msg_vec(T);
        let bs = rand_bool_vec(T);
        bench.iter(|| {
            _bench_ot(
                BatchOtSender::<_, SemiHonest, Vec<u8>>::new(&group, config).unwrap(),
                BatchOtReceiver::<_, SemiHonest, Vec<u8>>::new(&group, config).unwrap(),
                &bs,
                ms.clone(),
            )
        })
    });
    c.bench_function("batch_ot::OneSidedSimulation", |bench| {
        let ms = rand_msg_vec(T);
        let bs = rand_bool_vec(T);
        bench.iter(|| {
            _bench_ot(
                BatchOtSender::<_, OneSidedSimulation, Vec<u8>>::new(&group, config).unwrap(),
                BatchOtReceiver::<_, OneSidedSimulation, Vec<u8>>::new(&group, config).unwrap(),
                &bs,
                ms.clone(),
            )
        })
    });
    let zp = ZpSafePrimeGroup::modp_2048();
    c.bench_function("batch_ot::SemiHonest::modp_2048", |bench| {
        let ms = rand_msg_vec(T);
        let bs = rand_bool_vec(T);
        bench.iter(|| {
            _bench_ot(
                BatchOtSender::<_, SemiHonest, Vec<u8>>::new(&zp, config).unwrap(),
                BatchOtReceiver::<_, SemiHonest, Vec<u8>>::new(&zp, config).unwrap(),
                &bs,
                ms.clone(),
            )
        })
    });
}

criterion_group! {
    name = ot;
    config = Criterion::default().warm_up_time(Duration::from_millis(100)).sample_size(10);
    targets = bench_ot, bench_batch_ot
}

criterion_main!(ot);
