//! 4251 Hunter 公寓平面图
//!
//! 外轮廓 38'6" × 29'9"。每个房间在自己的局部坐标系中绘制，
//! 再平移到公寓中的位置。所有尺寸来自现场测量。

use archplan_core::builders::{connect_the_dots, door, rectangle};
use archplan_core::error::ModelError;
use archplan_core::math::Point2;
use archplan_core::model::PlanModel;
use archplan_core::units::{ft, ftin, Unit};
use tracing::debug;

pub const FULL_WIDTH: f64 = 38.0 * 12.0 + 6.0;
pub const FULL_HEIGHT: f64 = 29.0 * 12.0 + 9.0;

/// 标准室内门宽 2'10"
const DOOR: f64 = 34.0;

fn dots(closed: bool, points: &[[f64; 2]]) -> Result<PlanModel, ModelError> {
    let points: Vec<Point2> = points.iter().map(|[x, y]| Point2::new(*x, *y)).collect();
    connect_the_dots(closed, &points)
}

/// 步入式衣帽间，两扇 2' 门
fn walkin() -> Result<PlanModel, ModelError> {
    let width = ftin(4.0, 10.0);
    let height = ftin(9.0, 6.0);

    PlanModel::new("walkin")
        .attach(
            "outline",
            dots(
                false,
                &[
                    [ftin(0.0, 2.25), -ftin(0.0, 3.0)],
                    [ftin(0.0, 2.25), 0.0],
                    [0.0, 0.0],
                    [0.0, height],
                    [width, height],
                    [width, 0.0],
                    [width - ftin(0.0, 7.75), 0.0],
                    [width - ftin(0.0, 7.75), -ftin(0.0, 3.0)],
                ],
            )?,
        )?
        .attach(
            "door1",
            door(ft(2.0))?
                .rotate_degrees(180.0)
                .translate(width - ftin(0.0, 7.75), -ftin(0.0, 3.0)),
        )?
        .attach(
            "door2",
            door(ft(2.0))?
                .rotate_degrees(270.0)
                .translate(width - ftin(0.0, 7.75) - ft(4.0), -ftin(0.0, 3.0)),
        )
        .map(|m| m.with_size_caption("C"))
}

fn bedroom() -> Result<PlanModel, ModelError> {
    let top = ftin(13.0, 9.0);
    let bottom = ftin(11.0, 6.0);
    let right = ft(20.0);
    let left = ftin(4.0, 9.0);

    PlanModel::new("bedroom")
        .attach(
            "outline1",
            dots(
                false,
                &[
                    [0.0, right - ftin(1.0, 5.0) - DOOR],
                    [0.0, right - left],
                    [top - bottom, right - left],
                    [top - bottom, 0.0],
                    [top, 0.0],
                    [top, right],
                    [top - ftin(0.0, 7.5), right],
                ],
            )?,
        )?
        .attach(
            "outline2",
            dots(
                false,
                &[
                    [top - ftin(0.0, 7.5) - ft(4.0), right],
                    [ftin(2.0, 2.5) + DOOR, right],
                ],
            )?,
        )?
        .attach(
            "outline3",
            dots(
                false,
                &[
                    [ftin(2.0, 2.5), right],
                    [0.0, right],
                    [0.0, right - ftin(1.0, 5.0)],
                ],
            )?,
        )?
        .attach(
            "entrydoor",
            door(DOOR)?.translate(0.0, right - ftin(1.0, 5.0) - DOOR),
        )
        .map(|m| m.with_size_caption("BED"))
}

fn ensuite() -> Result<PlanModel, ModelError> {
    PlanModel::new("ensuite")
        .attach(
            "outline",
            dots(
                false,
                &[
                    [ftin(2.0, 2.5), 0.0],
                    [0.0, 0.0],
                    [0.0, ftin(8.0, 9.0)],
                    [ftin(8.0, 5.0), ftin(8.0, 9.0)],
                    [ftin(8.0, 5.0), 0.0],
                    [ftin(2.0, 2.25) + DOOR, 0.0],
                ],
            )?,
        )?
        .attach(
            "door",
            door(DOOR)?
                .rotate_degrees(90.0)
                .translate(ftin(2.0, 2.5) + DOOR, 0.0),
        )
        .map(|m| m.with_size_caption("BTH2"))
}

fn bath() -> Result<PlanModel, ModelError> {
    PlanModel::new("bath")
        .attach(
            "outline",
            dots(
                false,
                &[
                    [ftin(0.0, 4.0), 0.0],
                    [0.0, 0.0],
                    [0.0, ftin(9.0, 7.0)],
                    [ftin(5.0, 5.0), ftin(9.0, 7.0)],
                    [ftin(5.0, 5.0), ftin(1.0, 8.0)],
                    [ftin(5.0, 5.0) - ftin(1.0, 10.0), ftin(1.0, 8.0)],
                    [ftin(5.0, 5.0) - ftin(1.0, 10.0), 0.0],
                    [ftin(0.0, 4.0) + DOOR, 0.0],
                ],
            )?,
        )?
        .attach("door", door(DOOR)?.translate(ftin(0.0, 4.0), 0.0))
        .map(|m| m.with_size_caption("BTH1"))
}

/// 厨房与客厅，含半岛台和灶台
fn living() -> Result<PlanModel, ModelError> {
    let w = ftin(14.0, 11.0);
    let h = ftin(28.0, 5.0);

    PlanModel::new("living")
        .attach(
            "outline1",
            dots(
                false,
                &[
                    [0.0, 0.0],
                    [0.0, h - ftin(8.0, 9.0)],
                    [ft(1.0), h - ftin(8.0, 9.0)],
                    [ft(1.0), h],
                    [ft(10.0) - ftin(0.0, 6.0), h],
                    [ft(10.0) - ftin(0.0, 6.0), h - ftin(2.0, 2.0)],
                    [ft(10.0), h - ftin(2.0, 2.0)],
                    [ft(10.0), h],
                    [w, h],
                    [w, ft(19.0)],
                ],
            )?,
        )?
        .attach(
            "outline2",
            dots(false, &[[w, ft(15.0)], [w, 0.0], [0.0, 0.0]])?,
        )?
        .attach(
            "peninsula",
            rectangle(ft(9.0), ftin(3.0, 2.0))?.translate(ft(1.0), h - ftin(8.0, 9.0)),
        )?
        .attach(
            "cooktop",
            rectangle(ftin(8.0, 6.0), ftin(1.0, 11.0))?.translate(ft(1.0), h - ftin(1.0, 11.0)),
        )
        .map(|m| m.with_size_caption("LVRM"))
}

/// 电脑/家庭活动室
fn cfr() -> Result<PlanModel, ModelError> {
    let notch = ftin(12.0, 7.0);
    let depth = notch + ftin(2.0, 4.0);

    PlanModel::new("cfr")
        .attach(
            "outline",
            dots(
                false,
                &[
                    [0.0, 0.0],
                    [0.0, depth],
                    [ftin(3.0, 10.0), depth],
                    [ftin(3.0, 10.0), notch],
                    [ftin(11.0, 2.0), notch],
                    [ftin(11.0, 2.0), 0.0],
                    [0.0, 0.0],
                ],
            )?,
        )?
        .attach(
            "door",
            door(DOOR)?
                .rotate_degrees(270.0)
                .translate(ftin(0.0, 4.5), depth),
        )
        .map(|m| m.with_size_caption("CFR"))
}

/// 整个公寓
pub fn apartment() -> Result<PlanModel, ModelError> {
    let model = PlanModel::new("apartment")
        .with_units(Unit::Inch)
        .attach(
            "walkin",
            walkin()?.translate(FULL_WIDTH - ftin(4.0, 10.0), ftin(20.0, 3.0)),
        )?
        .attach(
            "bedroom",
            bedroom()?.translate(FULL_WIDTH - ftin(11.0, 6.0) - ftin(2.0, 2.5), 0.0),
        )?
        .attach(
            "ensuite",
            ensuite()?.translate(
                FULL_WIDTH - ftin(11.0, 6.0) - ftin(2.0, 2.5),
                FULL_HEIGHT - ftin(8.0, 9.0),
            ),
        )?
        .attach(
            "bath",
            bath()?.translate(
                ft(10.0) + ftin(4.0, 9.0) + ftin(3.0, 6.0) - ftin(0.0, 4.0),
                FULL_HEIGHT - ftin(9.0, 7.0),
            ),
        )?
        .attach(
            "cfr",
            cfr()?.translate(ftin(15.0, 9.0) - ftin(0.0, 4.5) - ftin(0.0, 4.0), 0.0),
        )?
        .attach("living", living()?)?;

    debug!(rooms = model.children().count(), "apartment composed");
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use archplan_core::geometry::Path;
    use archplan_core::math::{approx_eq, points_approx_eq};
    use std::collections::BTreeSet;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_footprint_constants() {
        assert!(approx_eq(FULL_WIDTH, ftin(38.0, 6.0)));
        assert!(approx_eq(FULL_HEIGHT, ftin(29.0, 9.0)));
        assert!(approx_eq(FULL_HEIGHT, 357.0));
    }

    #[test]
    fn test_all_rooms_present_with_unique_paths() {
        let plan = apartment().unwrap();
        let rooms: Vec<&str> = plan.children().map(|(name, _)| name).collect();
        assert_eq!(rooms, ["bath", "bedroom", "cfr", "ensuite", "living", "walkin"]);

        let resolved = plan.resolve();
        let paths: BTreeSet<&str> = resolved.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths.len(), resolved.len());
    }

    #[test]
    fn test_plan_fits_footprint() {
        let ext = apartment().unwrap().extents();
        // 衣帽间门槛向下伸出 3"
        assert!(ext.min.x >= -1e-6);
        assert!(ext.min.y >= -ftin(0.0, 3.0) - 1e-6);
        // 卧室东墙按测量值比外轮廓多出半英寸
        assert!(approx_eq(ext.max.x, FULL_WIDTH + 0.5));
        assert!(ext.max.y <= FULL_HEIGHT + 1e-6);
    }

    #[test]
    fn test_door_swings() {
        let plan = apartment().unwrap();
        let swings: Vec<_> = plan
            .resolve()
            .into_iter()
            .filter(|r| r.path.ends_with(".swing"))
            .collect();
        assert_eq!(swings.len(), 6);

        for swing in swings {
            match swing.primitive {
                Path::Arc(arc) => {
                    assert!(approx_eq(arc.sweep_angle(), FRAC_PI_2), "{}", swing.path);
                    assert!(
                        approx_eq(arc.radius, DOOR) || approx_eq(arc.radius, ft(2.0)),
                        "{}",
                        swing.path
                    );
                }
                _ => panic!("{} is not an arc", swing.path),
            }
        }
    }

    #[test]
    fn test_entry_door_hinges() {
        let plan = apartment().unwrap();

        let t = plan.composed_transform("bedroom.entrydoor").unwrap();
        assert!(points_approx_eq(
            &t.transform_point(&Point2::origin()),
            &Point2::new(297.5, 189.0)
        ));

        let t = plan.composed_transform("cfr.door").unwrap();
        assert!(points_approx_eq(
            &t.transform_point(&Point2::origin()),
            &Point2::new(185.0, 179.0)
        ));
    }

    #[test]
    fn test_room_captions() {
        let plan = apartment().unwrap();
        let captions = plan.captions();
        assert_eq!(captions.len(), 6);

        let cfr = captions.iter().find(|c| c.path == "cfr").unwrap();
        assert_eq!(cfr.text, "CFR: 11'2\" x 14'11\"");
    }
}
