use super::{CommitLog, School};
use crate::manager::ManagerResult;
use crate::model::{EntityId, EntityKind};
use log::info;

impl School {
    /// Enrolls a student in a course on both sides.
    ///
    /// Commit order: student, then course. A side that already reflects the
    /// enrollment is not rewritten, so enrolling twice is a no-op.
    pub async fn enroll_student_in_course(
        &self,
        student_id: &EntityId,
        course_id: &EntityId,
    ) -> ManagerResult<()> {
        let mut student = self.students.require(student_id).await?;
        let mut course = self.courses.require(course_id).await?;

        let student_changed = student.enroll(course.reference());
        let course_changed = course.add_student(student.reference());

        let mut log = CommitLog::new("enroll_student_in_course");
        if student_changed {
            log.write(EntityKind::Student, student_id, self.students.update(&student))
                .await?;
        }
        if course_changed {
            log.write(EntityKind::Course, course_id, self.courses.update(&course))
                .await?;
        }

        info!(
            "event=enroll module=service status=ok student_id={} course_id={} writes={}",
            student_id,
            course_id,
            log.len()
        );
        Ok(())
    }

    /// Removes a student from a course on both sides.
    ///
    /// Commit order: student, then course.
    pub async fn unenroll_student_from_course(
        &self,
        student_id: &EntityId,
        course_id: &EntityId,
    ) -> ManagerResult<()> {
        let mut student = self.students.require(student_id).await?;
        let mut course = self.courses.require(course_id).await?;

        let student_changed = student.unenroll(course_id);
        let course_changed = course.remove_student(student_id);

        let mut log = CommitLog::new("unenroll_student_from_course");
        if student_changed {
            log.write(EntityKind::Student, student_id, self.students.update(&student))
                .await?;
        }
        if course_changed {
            log.write(EntityKind::Course, course_id, self.courses.update(&course))
                .await?;
        }

        info!(
            "event=unenroll module=service status=ok student_id={} course_id={} writes={}",
            student_id,
            course_id,
            log.len()
        );
        Ok(())
    }

    /// Makes `teacher_id` the only teacher of `course_id`.
    ///
    /// Commit order: teacher, course, then the previous teacher (if another
    /// one was assigned) with the course removed from its list.
    pub async fn assign_teacher_to_course(
        &self,
        teacher_id: &EntityId,
        course_id: &EntityId,
    ) -> ManagerResult<()> {
        let mut teacher = self.teachers.require(teacher_id).await?;
        let mut course = self.courses.require(course_id).await?;

        let teacher_changed = teacher.assign_course(course.reference());
        let assigned = teacher.reference();
        let course_changed = course.teacher() != Some(&assigned);
        let previous = course
            .assign_teacher(assigned)
            .filter(|previous| &previous.id != teacher_id);

        let mut log = CommitLog::new("assign_teacher_to_course");
        if teacher_changed {
            log.write(EntityKind::Teacher, teacher_id, self.teachers.update(&teacher))
                .await?;
        }
        if course_changed {
            log.write(EntityKind::Course, course_id, self.courses.update(&course))
                .await?;
        }
        if let Some(previous) = previous {
            let former = log.step(self.teachers.get(&previous.id)).await?;
            if let Some(mut former) = former {
                if former.remove_course(course_id) {
                    log.write(EntityKind::Teacher, &previous.id, self.teachers.update(&former))
                        .await?;
                }
            }
        }

        info!(
            "event=assign_teacher module=service status=ok teacher_id={} course_id={} writes={}",
            teacher_id,
            course_id,
            log.len()
        );
        Ok(())
    }

    /// Leaves a course without a teacher.
    ///
    /// Commit order: course, then the former teacher with the course removed
    /// from its list. A course with no teacher is left untouched.
    pub async fn unassign_teacher_from_course(&self, course_id: &EntityId) -> ManagerResult<()> {
        let mut course = self.courses.require(course_id).await?;
        let Some(previous) = course.clear_teacher() else {
            return Ok(());
        };

        let mut log = CommitLog::new("unassign_teacher_from_course");
        log.write(EntityKind::Course, course_id, self.courses.update(&course))
            .await?;
        let former = log.step(self.teachers.get(&previous.id)).await?;
        if let Some(mut former) = former {
            if former.remove_course(course_id) {
                log.write(EntityKind::Teacher, &previous.id, self.teachers.update(&former))
                    .await?;
            }
        }

        info!(
            "event=unassign_teacher module=service status=ok teacher_id={} course_id={} writes={}",
            previous.id,
            course_id,
            log.len()
        );
        Ok(())
    }
}
