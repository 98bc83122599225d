//! Integration tests for label layout

use label_data::{parse_recipients, parse_sender};
use layout::{
    compute_page, compute_pages, DrawCommand, GreetingPosition, GreetingSettings, LabelJob,
    LogoSettings, PaperProfile, StampSettings, TextMeasurer,
};
use pretty_assertions::assert_eq;

/// Fixed-advance measurer: 0.5 mm per character per 10 pt
struct FixedMeasurer;

impl TextMeasurer for FixedMeasurer {
    fn width_mm(&self, text: &str, size_pt: f32, _bold: bool) -> f64 {
        text.chars().count() as f64 * size_pt as f64 * 0.05
    }
}

fn full_job() -> LabelJob {
    LabelJob::from_json(
        r#"{
            "paper": "a4-landscape",
            "sender": {
                "documentNumber": "ที่ อว 0601.01/ว 252",
                "organization": "กองบริหารงานทั่วไป",
                "institution": "มหาวิทยาลัยชายทุ่ง",
                "addressLine1": "เลขที่ 99 หมู่ 9 ตำบลคลองหนึ่ง",
                "addressLine2": "อำเภอคลองหลวง จังหวัดปทุมธานี",
                "postalCode": "12120"
            },
            "recipients": [
                {
                    "title": "ผู้อำนวยการโรงเรียนวัดคลองหนึ่งวิทยา",
                    "address": "เลขที่ 45 หมู่ 2 ตำบลคลองหนึ่ง",
                    "province": "จังหวัดปทุมธานี",
                    "postalCode": "12120"
                },
                {
                    "title": "นายสมชาย ใจดี",
                    "address": "123/45 หมู่ 6 ตำบลบางพูด",
                    "province": "จังหวัดนนทบุรี",
                    "postalCode": "11120"
                },
                {
                    "title": "นางสาวสมหญิง รักเรียน",
                    "address": "99 ถนนใหญ่ ตำบลในเมือง",
                    "province": "จังหวัดขอนแก่น",
                    "postalCode": "40000"
                }
            ],
            "stamp": { "enabled": false, "text": "ชำระค่าฝากส่งเป็นรายเดือน" },
            "greeting": { "text": "เรียน", "position": "left" },
            "logo": { "enabled": false, "sourceRef": "", "aspectRatio": 1 }
        }"#,
    )
    .unwrap()
}

#[test]
fn one_page_per_recipient_in_input_order() {
    let job = full_job();
    let pages = compute_pages(
        job.paper,
        &job.sender,
        &job.recipients,
        &job.stamp,
        &job.greeting,
        &job.logo,
        &FixedMeasurer,
    );

    assert_eq!(pages.len(), 3);

    let titles: Vec<&str> = pages
        .iter()
        .map(|page| {
            page.iter()
                .find_map(|c| match c {
                    DrawCommand::Text { text, size_pt, bold, .. }
                        if *size_pt == 26.0 && *bold && text != "เรียน" =>
                    {
                        Some(text.as_str())
                    }
                    _ => None,
                })
                .unwrap()
        })
        .collect();
    assert_eq!(
        titles,
        vec![
            "ผู้อำนวยการโรงเรียนวัดคลองหนึ่งวิทยา",
            "นายสมชาย ใจดี",
            "นางสาวสมหญิง รักเรียน"
        ]
    );

    // Shared blocks are identical across pages
    let sender_lines = |page: &Vec<DrawCommand>| -> Vec<DrawCommand> {
        page.iter()
            .filter(|c| matches!(c, DrawCommand::Text { size_pt, .. } if *size_pt == 18.0))
            .cloned()
            .collect()
    };
    assert_eq!(sender_lines(&pages[0]), sender_lines(&pages[2]));
}

#[test]
fn plain_a4_scenario_command_census() {
    let job = full_job();
    let page = compute_page(
        job.paper,
        &job.sender,
        &job.recipients[0],
        &job.stamp,
        &job.greeting,
        &job.logo,
        &FixedMeasurer,
    );

    let text_count = page
        .iter()
        .filter(|c| matches!(c, DrawCommand::Text { .. }))
        .count();
    let rect_count = page
        .iter()
        .filter(|c| matches!(c, DrawCommand::Rect { .. }))
        .count();
    let image_count = page
        .iter()
        .filter(|c| matches!(c, DrawCommand::Image { .. }))
        .count();

    // 6 sender lines + 1 greeting + 4 recipient lines
    assert_eq!((text_count, rect_count, image_count), (11, 0, 0));

    // Stamp disabled: the stored text must not leak onto the page
    assert!(!page
        .iter()
        .any(|c| matches!(c, DrawCommand::Text { text, .. } if text.contains("ชำระ"))));
}

#[test]
fn enabling_stamp_and_logo_adds_their_commands() {
    let mut job = full_job();
    job.stamp = StampSettings {
        enabled: true,
        text: "ชำระค่าฝากส่งเป็นรายเดือน\nใบอนุญาตเลขที่ 9/2567\nไปรษณีย์คลองหลวง".to_string(),
    };
    job.logo = LogoSettings {
        enabled: true,
        source_ref: "logo".to_string(),
        aspect_ratio: 1.2,
        custom_height_mm: None,
    };

    let page = compute_page(
        job.paper,
        &job.sender,
        &job.recipients[0],
        &job.stamp,
        &job.greeting,
        &job.logo,
        &FixedMeasurer,
    );

    let rects: Vec<&DrawCommand> = page
        .iter()
        .filter(|c| matches!(c, DrawCommand::Rect { .. }))
        .collect();
    assert_eq!(rects.len(), 1);

    let DrawCommand::Rect { x, width, height, .. } = rects[0] else {
        unreachable!()
    };
    // Three stamp lines; the box hugs the right margin
    assert_eq!(*height, 3.0 * 7.0 + 1.5 * 2.0);
    assert_eq!(*x, 297.0 - 20.0 - *width);

    let DrawCommand::Image { width, height, source_ref, .. } = page
        .iter()
        .find(|c| matches!(c, DrawCommand::Image { .. }))
        .unwrap()
    else {
        unreachable!()
    };
    assert_eq!(source_ref, "logo");
    assert_eq!(*height, 20.5);
    assert_eq!(*width, 20.5 * 1.2);
}

#[test]
fn parsed_text_drives_page_count() {
    let sender = parse_sender("ที่ ศธ 04001/123\nกลุ่มอำนวยการ\nสพป. ปทุมธานี เขต 1\nถนนรังสิต-ปทุมธานี\nอำเภอเมือง จังหวัดปทุมธานี\n12000");
    let recipients = parse_recipients(
        "นายหนึ่ง\nที่อยู่\nจังหวัด\n10000\n\nนายสอง\nที่อยู่\nจังหวัด\n20000",
    );

    let pages = compute_pages(
        PaperProfile::A4Landscape,
        &sender,
        &recipients,
        &StampSettings::default(),
        &GreetingSettings::default(),
        &LogoSettings::default(),
        &FixedMeasurer,
    );

    assert_eq!(pages.len(), 2);
}

#[test]
fn layout_is_deterministic() {
    let mut job = full_job();
    job.greeting.position = GreetingPosition::Top;
    job.stamp.enabled = true;

    let run = || {
        compute_pages(
            job.paper,
            &job.sender,
            &job.recipients,
            &job.stamp,
            &job.greeting,
            &job.logo,
            &FixedMeasurer,
        )
    };

    assert_eq!(run(), run());
}
