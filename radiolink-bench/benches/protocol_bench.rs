//! Packet and message encoding/decoding benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use radiolink_protocol::fragment::{defragment, fragment};
use radiolink_protocol::{Assembler, Encoder, LinkConfig, Message, Packet, MAX_PACKET_BODY_LENGTH};

fn create_test_packet(body_size: usize) -> Packet {
    let mut packet = Packet::with_body(&vec![0x42u8; body_size]).unwrap();
    packet.set_transmitter_id(0x0001);
    packet.seal();
    packet
}

fn create_test_message(body_size: usize) -> Message {
    Message::with_action(0x0101, &vec![0x42u8; body_size]).unwrap()
}

fn bench_packet_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("packet_encode");

    for size in [16, 128, MAX_PACKET_BODY_LENGTH] {
        let packet = create_test_packet(size);

        group.throughput(Throughput::Bytes(packet.wire_size() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &packet, |b, packet| {
            b.iter(|| black_box(packet.encode()));
        });
    }

    group.finish();
}

fn bench_packet_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("packet_parse");

    for size in [16, 128, MAX_PACKET_BODY_LENGTH] {
        let encoded = create_test_packet(size).encode();

        group.throughput(Throughput::Bytes(encoded.len() as u64));
        group.bench_with_input(BenchmarkId::new("unverified", size), &encoded, |b, encoded| {
            b.iter(|| black_box(Packet::parse(encoded).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("verified", size), &encoded, |b, encoded| {
            b.iter(|| black_box(Packet::parse_verified(encoded).unwrap()));
        });
    }

    group.finish();
}

fn bench_message_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_parse");

    for size in [100, 1000, 10000] {
        let encoded = create_test_message(size).encode();

        group.throughput(Throughput::Bytes(encoded.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &encoded, |b, encoded| {
            b.iter(|| black_box(Message::parse(encoded).unwrap()));
        });
    }

    group.finish();
}

fn bench_fragment(c: &mut Criterion) {
    let mut group = c.benchmark_group("fragment");

    for size in [100, 1000, 10000] {
        let data = vec![0x42u8; size];
        let packets = fragment(&data).unwrap();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("split", size), &data, |b, data| {
            b.iter(|| black_box(fragment(data).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("join", size), &packets, |b, packets| {
            b.iter(|| black_box(defragment(packets)));
        });
    }

    group.finish();
}

fn bench_link_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("link_roundtrip");
    let config = LinkConfig::default();
    let encoder = Encoder::new(&config);

    for size in [100, 1000, 10000] {
        let message = create_test_message(size);
        let frames = encoder.encode_frames(&message).unwrap();

        group.throughput(Throughput::Bytes(message.message_length() as u64));
        group.bench_with_input(BenchmarkId::new("encode", size), &message, |b, message| {
            b.iter(|| black_box(encoder.encode_frames(message).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("assemble", size), &frames, |b, frames| {
            b.iter(|| {
                let mut assembler = Assembler::new(&config);
                let mut decoded = None;
                for frame in frames {
                    decoded = assembler.push_frame(frame).unwrap();
                }
                black_box(decoded)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_packet_encode,
    bench_packet_parse,
    bench_message_parse,
    bench_fragment,
    bench_link_roundtrip,
);

criterion_main!(benches);
